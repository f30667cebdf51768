//! Phase 1: greedy clustering with distance expansion

use crate::distance::color_distance_sq;
use crate::{ColorError, ColorResult};
use chromaseg_core::{LabelImage, MAX_PALETTE_SIZE, Palette, Rgb, RgbImage};
use log::{debug, warn};

/// Maximum number of clustering attempts
pub const MAX_ALLOWED_ITERATIONS: u32 = 20;

/// Factor by which max_dist grows after each failed attempt
pub const DIST_EXPAND_FACTOR: f32 = 1.3;

/// Result of a successful Phase 1 run
#[derive(Debug, Clone)]
pub struct ClusterResult {
    /// Cluster centroids, with populations
    pub palette: Palette,
    /// Cluster index of every pixel
    pub labels: LabelImage,
    /// Number of clustering attempts made (1 means no retry)
    pub attempts: u32,
    /// Distance threshold of the successful attempt
    pub max_dist: f32,
}

/// Running sums for one cluster
struct Accumulator {
    /// Color of the pixel that opened the cluster; membership is tested
    /// against this, not the moving average
    seed: Rgb,
    sum: [u64; 3],
    count: u64,
}

impl Accumulator {
    fn new(seed: Rgb) -> Self {
        Self {
            seed,
            sum: [seed.r as u64, seed.g as u64, seed.b as u64],
            count: 1,
        }
    }

    #[inline]
    fn add(&mut self, c: Rgb) {
        self.sum[0] += c.r as u64;
        self.sum[1] += c.g as u64;
        self.sum[2] += c.b as u64;
        self.count += 1;
    }

    /// Mean color, rounded to nearest
    fn centroid(&self) -> Rgb {
        let avg = |s: u64| ((s + self.count / 2) / self.count) as u8;
        Rgb::new(avg(self.sum[0]), avg(self.sum[1]), avg(self.sum[2]))
    }
}

/// Cluster the image once at a fixed distance threshold.
///
/// Pixels are visited in raster order. Each pixel joins the first cluster
/// (lowest index) whose seed color is within `max_dist`, otherwise it
/// opens a new cluster. On success, each cluster's color is its centroid.
///
/// # Errors
///
/// - [`ColorError::TooManyColors`] if more than `max_colors` clusters would
///   be needed
/// - [`ColorError::InvalidParameters`] for `max_colors` outside `1..=256` or
///   a negative or non-finite `max_dist`
pub fn try_cluster(
    image: &RgbImage,
    max_dist: f32,
    max_colors: u32,
) -> ColorResult<(Palette, LabelImage)> {
    check_max_colors(max_colors)?;
    if !max_dist.is_finite() || max_dist < 0.0 {
        return Err(ColorError::InvalidParameters(format!(
            "max_dist must be finite and non-negative, got {max_dist}"
        )));
    }

    let threshold = threshold_sq(max_dist);
    let (w, h) = image.dimensions();
    let mut labels = LabelImage::new(w, h)?;
    let mut clusters: Vec<Accumulator> = Vec::with_capacity(max_colors as usize);

    for y in 0..h {
        for (x, &c) in image.row(y).iter().enumerate() {
            let k = match clusters
                .iter()
                .position(|a| color_distance_sq(c, a.seed) <= threshold)
            {
                Some(k) => {
                    clusters[k].add(c);
                    k
                }
                None => {
                    if clusters.len() >= max_colors as usize {
                        return Err(ColorError::TooManyColors {
                            max_colors,
                            max_dist,
                        });
                    }
                    clusters.push(Accumulator::new(c));
                    clusters.len() - 1
                }
            };
            labels.set_unchecked(x as u32, y, k as u8);
        }
    }

    let mut palette = Palette::new(max_colors as usize)?;
    let mut counts = Vec::with_capacity(clusters.len());
    for acc in &clusters {
        palette.push(acc.centroid())?;
        counts.push(acc.count as u32);
    }
    palette.set_populations(&counts)?;

    Ok((palette, labels))
}

/// Greedy clustering with automatic distance expansion.
///
/// Runs [`try_cluster`], multiplying the threshold by
/// [`DIST_EXPAND_FACTOR`] after each [`ColorError::TooManyColors`], for at
/// most [`MAX_ALLOWED_ITERATIONS`] attempts.
///
/// # Errors
///
/// [`ColorError::ConvergenceFailure`] if no attempt fits in `max_colors`.
pub fn color_segment_cluster(
    image: &RgbImage,
    max_dist: u32,
    max_colors: u32,
) -> ColorResult<ClusterResult> {
    cluster_with_retry(image, max_dist as f32, max_colors, &mut || false)
}

/// Distance expansion loop. `should_cancel` is consulted before every
/// retry.
pub(crate) fn cluster_with_retry(
    image: &RgbImage,
    max_dist: f32,
    max_colors: u32,
    should_cancel: &mut dyn FnMut() -> bool,
) -> ColorResult<ClusterResult> {
    check_max_colors(max_colors)?;

    let mut current_dist = max_dist;
    for attempt in 1..=MAX_ALLOWED_ITERATIONS {
        if attempt > 1 && should_cancel() {
            warn!("color segmentation cancelled after {} attempts", attempt - 1);
            return Err(ColorError::Cancelled {
                iterations: attempt - 1,
            });
        }
        match try_cluster(image, current_dist, max_colors) {
            Ok((palette, labels)) => {
                return Ok(ClusterResult {
                    palette,
                    labels,
                    attempts: attempt,
                    max_dist: current_dist,
                });
            }
            Err(ColorError::TooManyColors { .. }) => {
                let next = current_dist * DIST_EXPAND_FACTOR;
                debug!(
                    "attempt {attempt}: more than {max_colors} clusters at max_dist {current_dist:.1}, retrying at {next:.1}"
                );
                current_dist = next;
            }
            Err(e) => return Err(e),
        }
    }

    warn!(
        "clustering failed after {MAX_ALLOWED_ITERATIONS} attempts (final max_dist {current_dist:.1})"
    );
    Err(ColorError::ConvergenceFailure {
        iterations: MAX_ALLOWED_ITERATIONS,
        max_dist: current_dist,
    })
}

fn check_max_colors(max_colors: u32) -> ColorResult<()> {
    if max_colors == 0 || max_colors as usize > MAX_PALETTE_SIZE {
        return Err(ColorError::InvalidParameters(format!(
            "max_colors must be between 1 and {MAX_PALETTE_SIZE}"
        )));
    }
    Ok(())
}

/// Largest integer squared distance that is within `max_dist`.
fn threshold_sq(max_dist: f32) -> u32 {
    let d = max_dist as f64;
    (d * d).floor().min(u32::MAX as f64) as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    fn three_bands() -> RgbImage {
        RgbImage::from_fn(60, 60, |x, _| {
            if x < 20 {
                Rgb::new(255, 0, 0)
            } else if x < 40 {
                Rgb::new(0, 255, 0)
            } else {
                Rgb::new(0, 0, 255)
            }
        })
        .unwrap()
    }

    #[test]
    fn test_distinct_bands() {
        let (palette, labels) = try_cluster(&three_bands(), 100.0, 10).unwrap();
        assert_eq!(palette.len(), 3);
        assert_eq!(palette.colors()[1], Rgb::new(0, 255, 0));
        assert_eq!(palette.populations(), vec![1200, 1200, 1200]);
        assert_eq!(labels.get(25, 10), Some(1));
    }

    #[test]
    fn test_first_fit_not_best_fit() {
        // 60 is within 50 of both seeds; first fit picks cluster 0 even
        // though seed 100 is nearer.
        let img = RgbImage::from_pixels(
            3,
            1,
            vec![Rgb::new(10, 0, 0), Rgb::new(100, 0, 0), Rgb::new(60, 0, 0)],
        )
        .unwrap();
        let (palette, labels) = try_cluster(&img, 50.0, 4).unwrap();
        assert_eq!(labels.labels(), &[0, 1, 0]);
        assert_eq!(palette.colors()[0], Rgb::new(35, 0, 0));
    }

    #[test]
    fn test_membership_uses_seed_not_centroid() {
        // 0 opens a cluster, 40 joins it; the centroid drifts to 20, but 60
        // is compared against the seed 0 and so opens a new cluster.
        let img = RgbImage::from_pixels(
            3,
            1,
            vec![Rgb::new(0, 0, 0), Rgb::new(40, 0, 0), Rgb::new(60, 0, 0)],
        )
        .unwrap();
        let (palette, labels) = try_cluster(&img, 45.0, 4).unwrap();
        assert_eq!(labels.labels(), &[0, 0, 1]);
        assert_eq!(palette.colors(), vec![Rgb::new(20, 0, 0), Rgb::new(60, 0, 0)]);
    }

    #[test]
    fn test_centroid_rounds_to_nearest() {
        let img = RgbImage::from_pixels(2, 1, vec![Rgb::new(10, 11, 0), Rgb::new(11, 12, 1)])
            .unwrap();
        let (palette, _) = try_cluster(&img, 5.0, 1).unwrap();
        // 10.5 -> 11, 11.5 -> 12, 0.5 -> 1
        assert_eq!(palette.colors()[0], Rgb::new(11, 12, 1));
    }

    #[test]
    fn test_too_many_colors() {
        let result = try_cluster(&three_bands(), 10.0, 2);
        assert!(matches!(
            result,
            Err(ColorError::TooManyColors { max_colors: 2, .. })
        ));
    }

    #[test]
    fn test_retry_expands_distance() {
        // red-green distance is ~360; 100 * 1.3^n first exceeds that at n = 5
        let result = color_segment_cluster(&three_bands(), 100, 2).unwrap();
        assert!(result.attempts > 1);
        assert!(result.palette.len() <= 2);
        assert!(result.max_dist > 100.0);
    }

    #[test]
    fn test_convergence_failure() {
        // a zero threshold never grows
        let result = color_segment_cluster(&three_bands(), 0, 2);
        assert!(matches!(
            result,
            Err(ColorError::ConvergenceFailure { iterations: 20, .. })
        ));
    }

    #[test]
    fn test_cancel_between_attempts() {
        let mut calls = 0;
        let result = cluster_with_retry(&three_bands(), 1.0, 2, &mut || {
            calls += 1;
            calls >= 3
        });
        assert!(matches!(result, Err(ColorError::Cancelled { iterations: 3 })));
    }

    #[test]
    fn test_invalid_params() {
        let img = three_bands();
        assert!(try_cluster(&img, 75.0, 0).is_err());
        assert!(try_cluster(&img, 75.0, 257).is_err());
        assert!(try_cluster(&img, -1.0, 10).is_err());
        assert!(try_cluster(&img, f32::NAN, 10).is_err());
        assert!(color_segment_cluster(&img, 75, 0).is_err());
    }
}
