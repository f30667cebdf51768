//! Octcube nearest-color index
//!
//! Naive nearest-palette search costs O(|palette|) per pixel. Instead the
//! RGB cube is split into `(2^level)^3` octcubes and, once per palette, the
//! nearest entry to each octcube's center is stored in a table. A pixel
//! lookup is then three shifts and one table read.
//!
//! The answer is exact for the octcube center and approximate for the other
//! colors in the cube; at level 4 a cube is 16 values wide per channel.

use crate::distance::DistanceMetric;
use crate::{ColorError, ColorResult};
use chromaseg_core::{Palette, Rgb};

/// Default octcube level (4096 cubes)
pub const DEFAULT_OCTREE_LEVEL: u32 = 4;

/// Deepest supported level (262144 cubes)
pub const MAX_OCTREE_LEVEL: u32 = 6;

/// Parameters for building an [`OctreeIndex`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LookupOptions {
    /// Octcube level, 1..=6
    pub level: u32,
    /// Metric used to pick each cube's nearest palette entry
    pub metric: DistanceMetric,
}

impl Default for LookupOptions {
    fn default() -> Self {
        Self {
            level: DEFAULT_OCTREE_LEVEL,
            metric: DistanceMetric::Manhattan,
        }
    }
}

/// Lookup table from octcube to nearest palette index
#[derive(Debug, Clone)]
pub struct OctreeIndex {
    level: u32,
    lut: Vec<u8>,
}

impl OctreeIndex {
    /// Build the table for `palette` at `level`.
    ///
    /// Each cube maps to the palette entry nearest its center under
    /// `metric`; ties go to the lower index.
    ///
    /// # Errors
    ///
    /// - [`ColorError::InvalidParameters`] if `level` is not in `1..=6`
    /// - [`ColorError::EmptyPalette`] if the palette has no entries
    pub fn build(palette: &Palette, level: u32, metric: DistanceMetric) -> ColorResult<Self> {
        if !(1..=MAX_OCTREE_LEVEL).contains(&level) {
            return Err(ColorError::InvalidParameters(format!(
                "octree level must be between 1 and {MAX_OCTREE_LEVEL}, got {level}"
            )));
        }
        if palette.is_empty() {
            return Err(ColorError::EmptyPalette);
        }

        let colors = palette.colors();
        let ncubes = 1usize << (3 * level);
        let lut = (0..ncubes)
            .map(|cube| {
                let center = cube_center(cube, level);
                let mut best = 0usize;
                let mut best_dist = u32::MAX;
                for (i, &c) in colors.iter().enumerate() {
                    let d = metric.distance(center, c);
                    if d < best_dist {
                        best_dist = d;
                        best = i;
                        if d == 0 {
                            break;
                        }
                    }
                }
                best as u8
            })
            .collect();

        Ok(Self { level, lut })
    }

    /// Build the table for `palette` with the given options.
    pub fn with_options(palette: &Palette, options: &LookupOptions) -> ColorResult<Self> {
        Self::build(palette, options.level, options.metric)
    }

    #[inline]
    pub fn level(&self) -> u32 {
        self.level
    }

    /// Number of octcubes in the table.
    #[inline]
    pub fn len(&self) -> usize {
        self.lut.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.lut.is_empty()
    }

    /// Palette index nearest to `color`.
    #[inline]
    pub fn lookup(&self, color: Rgb) -> u8 {
        self.lut[cube_index(color, self.level)]
    }
}

/// Octcube containing `color` at `level`.
///
/// The top `level` bits of each channel are concatenated as R, G, B.
#[inline]
pub fn cube_index(color: Rgb, level: u32) -> usize {
    let shift = 8 - level;
    ((color.r >> shift) as usize) << (2 * level)
        | ((color.g >> shift) as usize) << level
        | (color.b >> shift) as usize
}

/// Center color of octcube `index` at `level`.
pub fn cube_center(index: usize, level: u32) -> Rgb {
    let shift = 8 - level;
    let mask = (1usize << level) - 1;
    let half = (1u32 << shift) >> 1;
    let channel = |v: usize| ((v as u32) << shift | half) as u8;
    Rgb::new(
        channel((index >> (2 * level)) & mask),
        channel((index >> level) & mask),
        channel(index & mask),
    )
}
