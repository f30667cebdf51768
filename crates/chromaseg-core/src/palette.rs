//! Palette - ordered list of color clusters
//!
//! A palette maps label values to representative colors. It plays the role
//! of a colormap for a [`LabelImage`](crate::LabelImage): label `i` refers
//! to `palette[i]`. Labels are 8 bits wide, so a palette never holds more
//! than [`MAX_PALETTE_SIZE`] entries.

use crate::color::Rgb;
use crate::error::{Error, Result};

/// Largest palette addressable by an 8-bit label
pub const MAX_PALETTE_SIZE: usize = 256;

/// One palette entry: a representative color and its pixel population.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cluster {
    /// Representative color
    pub color: Rgb,
    /// Number of pixels currently assigned
    pub pixel_count: u32,
}

impl Cluster {
    pub fn new(color: Rgb) -> Self {
        Self {
            color,
            pixel_count: 0,
        }
    }
}

/// Bounded, ordered sequence of [`Cluster`]s.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Palette {
    clusters: Vec<Cluster>,
    max_colors: usize,
}

impl Palette {
    /// Create an empty palette holding at most `max_colors` entries.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidParameter`] unless `1 <= max_colors <= 256`.
    pub fn new(max_colors: usize) -> Result<Self> {
        if max_colors == 0 || max_colors > MAX_PALETTE_SIZE {
            return Err(Error::InvalidParameter(format!(
                "max_colors must be between 1 and {MAX_PALETTE_SIZE}, got {max_colors}"
            )));
        }
        Ok(Self {
            clusters: Vec::with_capacity(max_colors),
            max_colors,
        })
    }

    /// Build a palette from a list of colors (populations zero).
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidParameter`] for an empty or oversized list.
    pub fn from_colors(colors: &[Rgb]) -> Result<Self> {
        let mut palette = Self::new(colors.len())?;
        for &c in colors {
            palette.push(c)?;
        }
        Ok(palette)
    }

    /// Number of entries.
    #[inline]
    pub fn len(&self) -> usize {
        self.clusters.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.clusters.is_empty()
    }

    /// Capacity bound.
    #[inline]
    pub fn max_colors(&self) -> usize {
        self.max_colors
    }

    /// True if no more entries can be added.
    #[inline]
    pub fn is_full(&self) -> bool {
        self.clusters.len() >= self.max_colors
    }

    /// Append a cluster seeded with `color` and return its index.
    ///
    /// # Errors
    ///
    /// Returns [`Error::PaletteFull`] if the palette is at capacity.
    pub fn push(&mut self, color: Rgb) -> Result<usize> {
        if self.is_full() {
            return Err(Error::PaletteFull {
                max: self.max_colors,
            });
        }
        self.clusters.push(Cluster::new(color));
        Ok(self.clusters.len() - 1)
    }

    #[inline]
    pub fn get(&self, index: usize) -> Option<&Cluster> {
        self.clusters.get(index)
    }

    #[inline]
    pub fn get_mut(&mut self, index: usize) -> Option<&mut Cluster> {
        self.clusters.get_mut(index)
    }

    /// Color of entry `index`.
    #[inline]
    pub fn color(&self, index: usize) -> Option<Rgb> {
        self.clusters.get(index).map(|c| c.color)
    }

    pub fn clusters(&self) -> &[Cluster] {
        &self.clusters
    }

    pub fn iter(&self) -> impl Iterator<Item = &Cluster> {
        self.clusters.iter()
    }

    /// All representative colors, in index order.
    pub fn colors(&self) -> Vec<Rgb> {
        self.clusters.iter().map(|c| c.color).collect()
    }

    /// All populations, in index order.
    pub fn populations(&self) -> Vec<u32> {
        self.clusters.iter().map(|c| c.pixel_count).collect()
    }

    /// Overwrite every population.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidParameter`] if `counts.len() != self.len()`.
    pub fn set_populations(&mut self, counts: &[u32]) -> Result<()> {
        if counts.len() != self.clusters.len() {
            return Err(Error::InvalidParameter(format!(
                "{} counts for {} palette entries",
                counts.len(),
                self.clusters.len()
            )));
        }
        for (cluster, &n) in self.clusters.iter_mut().zip(counts) {
            cluster.pixel_count = n;
        }
        Ok(())
    }

    /// Sum of all populations.
    pub fn total_population(&self) -> u64 {
        self.clusters.iter().map(|c| c.pixel_count as u64).sum()
    }

    /// Index of the entry closest to `color` in squared Euclidean distance.
    ///
    /// Exhaustive search; ties go to the lower index. Returns `None` for an
    /// empty palette.
    pub fn find_nearest(&self, color: Rgb) -> Option<usize> {
        let mut best: Option<(usize, u32)> = None;
        for (i, c) in self.clusters.iter().enumerate() {
            let dr = c.color.r as i32 - color.r as i32;
            let dg = c.color.g as i32 - color.g as i32;
            let db = c.color.b as i32 - color.b as i32;
            let dist = (dr * dr + dg * dg + db * db) as u32;
            if best.is_none_or(|(_, d)| dist < d) {
                best = Some((i, dist));
                if dist == 0 {
                    break;
                }
            }
        }
        best.map(|(i, _)| i)
    }

    /// Drop every entry whose `keep` flag is false, preserving order.
    ///
    /// Returns the old-index to new-index map (`None` for dropped entries),
    /// to be applied to the labels with
    /// [`LabelImage::remap`](crate::LabelImage::remap).
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidParameter`] if `keep.len() != self.len()`.
    pub fn compact(&mut self, keep: &[bool]) -> Result<Vec<Option<u8>>> {
        if keep.len() != self.clusters.len() {
            return Err(Error::InvalidParameter(format!(
                "{} keep flags for {} palette entries",
                keep.len(),
                self.clusters.len()
            )));
        }
        let mut map = Vec::with_capacity(keep.len());
        let mut next = 0usize;
        for &k in keep {
            if k {
                map.push(Some(next as u8));
                next += 1;
            } else {
                map.push(None);
            }
        }
        let mut flags = keep.iter();
        self.clusters.retain(|_| *flags.next().unwrap_or(&false));
        Ok(map)
    }
}

impl std::ops::Index<usize> for Palette {
    type Output = Cluster;

    fn index(&self, index: usize) -> &Cluster {
        &self.clusters[index]
    }
}
