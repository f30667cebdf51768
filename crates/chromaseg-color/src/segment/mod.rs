//! Color segmentation
//!
//! Unsupervised segmentation of an RGB image into a small number of
//! colors. The algorithm proceeds in 4 phases:
//!
//! 1. **Cluster**: greedy first-fit assignment of pixels to clusters, with
//!    the distance threshold expanded until the palette fits
//! 2. **Refine**: reassign every pixel to its nearest cluster color
//! 3. **Clean**: morphological closing of each cluster, largest first
//! 4. **Reduce**: drop the least populous clusters and reassign their
//!    pixels
//!
//! Each phase is public so it can be run on its own; [`color_segment`]
//! sequences all four.

mod clean;
mod cluster;
mod reduce;
mod refine;

pub use clean::color_segment_clean;
pub use cluster::{
    ClusterResult, DIST_EXPAND_FACTOR, MAX_ALLOWED_ITERATIONS, color_segment_cluster, try_cluster,
};
pub use reduce::color_segment_remove_colors;
pub use refine::assign_to_nearest_color;

use crate::octree::{LookupOptions, MAX_OCTREE_LEVEL};
use crate::{ColorError, ColorResult};
use chromaseg_core::{LabelImage, MAX_PALETTE_SIZE, Palette, RgbImage};
use log::debug;
use std::cmp::Reverse;

/// Options for color segmentation
///
/// The parameters interact as follows:
/// - `max_dist` controls how similar colors must be to join a cluster
/// - `max_colors` limits Phase 1 output (should be ~2x `final_colors`)
/// - `final_colors` is the target number of colors after Phase 4
///
/// # Guidelines
///
/// | final_colors | max_colors | max_dist |
/// |--------------|------------|----------|
/// | 3            | 6          | 100      |
/// | 4            | 8          | 90       |
/// | 5            | 10         | 75       |
/// | 6            | 12         | 60       |
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColorSegmentOptions {
    /// Initial Euclidean distance threshold for Phase 1
    ///
    /// Lower values create more clusters. Grown by
    /// [`DIST_EXPAND_FACTOR`] whenever `max_colors` is exceeded.
    pub max_dist: u32,

    /// Maximum number of colors in Phase 1 (1..=256)
    pub max_colors: u32,

    /// Linear size of the closing brick for Phase 3
    ///
    /// Set to 0 or 1 to skip cleanup.
    pub sel_size: u32,

    /// Maximum number of colors after Phase 4 (1..=`max_colors`)
    pub final_colors: u32,

    /// Nearest-color table used by Phases 2 and 4
    pub lookup: LookupOptions,
}

impl Default for ColorSegmentOptions {
    fn default() -> Self {
        Self {
            max_dist: 75,
            max_colors: 10,
            sel_size: 4,
            final_colors: 5,
            lookup: LookupOptions::default(),
        }
    }
}

impl ColorSegmentOptions {
    /// Options tuned for a target number of final colors.
    pub fn for_colors(final_colors: u32) -> Self {
        let (max_colors, max_dist) = match final_colors {
            0..=3 => (6, 100),
            4 => (8, 90),
            5 => (10, 75),
            _ => (final_colors.saturating_mul(2), 60),
        };
        Self {
            max_dist,
            max_colors,
            final_colors,
            ..Self::default()
        }
    }

    /// Check that every parameter is in range.
    ///
    /// # Errors
    ///
    /// Returns [`ColorError::InvalidParameters`] naming the first bad field.
    pub fn validate(&self) -> ColorResult<()> {
        if self.max_colors == 0 || self.max_colors as usize > MAX_PALETTE_SIZE {
            return Err(ColorError::InvalidParameters(format!(
                "max_colors must be between 1 and {MAX_PALETTE_SIZE}, got {}",
                self.max_colors
            )));
        }
        if self.final_colors == 0 || self.final_colors > self.max_colors {
            return Err(ColorError::InvalidParameters(format!(
                "final_colors must be between 1 and max_colors ({}), got {}",
                self.max_colors, self.final_colors
            )));
        }
        if !(1..=MAX_OCTREE_LEVEL).contains(&self.lookup.level) {
            return Err(ColorError::InvalidParameters(format!(
                "octree level must be between 1 and {MAX_OCTREE_LEVEL}, got {}",
                self.lookup.level
            )));
        }
        Ok(())
    }
}

/// Output of [`color_segment`]
#[derive(Debug, Clone, PartialEq)]
pub struct Segmentation {
    /// Final colors, with the number of pixels carrying each one
    pub palette: Palette,
    /// Palette index of every pixel
    pub labels: LabelImage,
    /// Phase 1 attempts needed (1 means the initial threshold sufficed)
    pub attempts: u32,
    /// Phase 1 threshold that succeeded
    pub max_dist: f32,
}

impl Segmentation {
    /// Render the labels with their palette colors.
    pub fn to_rgb_image(&self) -> ColorResult<RgbImage> {
        Ok(self.labels.to_rgb(&self.palette)?)
    }
}

/// Perform unsupervised color segmentation
///
/// Runs all four phases and returns at most `options.final_colors` colors
/// with a label for every pixel.
///
/// # Errors
///
/// - [`ColorError::InvalidParameters`] if `options` fail
///   [`ColorSegmentOptions::validate`]
/// - [`ColorError::ConvergenceFailure`] if Phase 1 cannot fit the image in
///   `max_colors` clusters within [`MAX_ALLOWED_ITERATIONS`] attempts
///
/// # Example
///
/// ```
/// use chromaseg_color::segment::{ColorSegmentOptions, color_segment};
/// use chromaseg_core::{Rgb, RgbImage};
///
/// let image = RgbImage::from_fn(32, 32, |x, _| {
///     if x < 16 { Rgb::new(200, 30, 30) } else { Rgb::new(30, 30, 200) }
/// })
/// .unwrap();
/// let seg = color_segment(&image, &ColorSegmentOptions::for_colors(3)).unwrap();
/// assert_eq!(seg.palette.len(), 2);
/// ```
pub fn color_segment(image: &RgbImage, options: &ColorSegmentOptions) -> ColorResult<Segmentation> {
    color_segment_cancellable(image, options, || false)
}

/// [`color_segment`] with a cancellation hook.
///
/// `should_cancel` is polled before each Phase 1 retry; returning `true`
/// aborts with [`ColorError::Cancelled`].
pub fn color_segment_cancellable(
    image: &RgbImage,
    options: &ColorSegmentOptions,
    mut should_cancel: impl FnMut() -> bool,
) -> ColorResult<Segmentation> {
    options.validate()?;

    // Phase 1
    let ClusterResult {
        mut palette,
        mut labels,
        attempts,
        max_dist,
    } = cluster::cluster_with_retry(
        image,
        options.max_dist as f32,
        options.max_colors,
        &mut should_cancel,
    )?;
    debug!(
        "phase 1: {} clusters after {attempts} attempts (max_dist {max_dist:.1})",
        palette.len()
    );

    // Phase 2
    let counts = assign_to_nearest_color(image, &mut labels, &palette, None, options.lookup)?;
    palette.set_populations(&counts)?;
    debug!("phase 2: populations {counts:?}");

    // Phase 3; ranking keeps the Phase 2 counts
    color_segment_clean(&mut labels, &counts, options.sel_size)?;

    // Phase 4
    color_segment_remove_colors(
        image,
        &mut labels,
        &mut palette,
        &counts,
        options.final_colors,
        options.lookup,
    )?;
    palette.set_populations(&labels.histogram(palette.len()))?;
    debug!(
        "phase 4: {} colors, populations {:?}",
        palette.len(),
        palette.populations()
    );

    Ok(Segmentation {
        palette,
        labels,
        attempts,
        max_dist,
    })
}

/// Segment into at most `final_colors` colors with tuned defaults.
pub fn color_segment_simple(image: &RgbImage, final_colors: u32) -> ColorResult<Segmentation> {
    color_segment(image, &ColorSegmentOptions::for_colors(final_colors))
}

/// Cluster indices from most to least populous; ties keep index order.
pub(crate) fn rank_by_population(counts: &[u32]) -> Vec<usize> {
    let mut order: Vec<usize> = (0..counts.len()).collect();
    order.sort_by_key(|&i| Reverse(counts[i]));
    order
}
