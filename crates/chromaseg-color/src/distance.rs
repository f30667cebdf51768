//! Color distances
//!
//! Clustering and population tests use squared Euclidean distance in RGB.
//! Lookup-table construction may use Manhattan distance instead; the two
//! disagree only for colors almost equidistant from two palette entries.

use chromaseg_core::Rgb;

/// Metric used to pick the nearest palette entry when building a lookup table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DistanceMetric {
    /// Sum of absolute channel differences
    #[default]
    Manhattan,
    /// Squared Euclidean distance
    Euclidean,
}

impl DistanceMetric {
    /// Distance between two colors under this metric.
    ///
    /// Only the ordering is meaningful; Euclidean is left squared.
    #[inline]
    pub fn distance(self, a: Rgb, b: Rgb) -> u32 {
        match self {
            DistanceMetric::Manhattan => manhattan_distance(a, b),
            DistanceMetric::Euclidean => color_distance_sq(a, b),
        }
    }
}

/// Squared Euclidean distance between two colors.
#[inline]
pub fn color_distance_sq(a: Rgb, b: Rgb) -> u32 {
    let dr = a.r as i32 - b.r as i32;
    let dg = a.g as i32 - b.g as i32;
    let db = a.b as i32 - b.b as i32;
    (dr * dr + dg * dg + db * db) as u32
}

/// Manhattan (L1) distance between two colors.
#[inline]
pub fn manhattan_distance(a: Rgb, b: Rgb) -> u32 {
    a.r.abs_diff(b.r) as u32 + a.g.abs_diff(b.g) as u32 + a.b.abs_diff(b.b) as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_distances() {
        let a = Rgb::new(10, 20, 30);
        let b = Rgb::new(13, 16, 30);
        assert_eq!(color_distance_sq(a, b), 25);
        assert_eq!(manhattan_distance(a, b), 7);
        assert_eq!(color_distance_sq(a, a), 0);
        assert_eq!(color_distance_sq(Rgb::BLACK, Rgb::WHITE), 3 * 255 * 255);
    }

    #[test]
    fn test_metric_dispatch() {
        let a = Rgb::new(0, 0, 0);
        let b = Rgb::new(3, 4, 0);
        assert_eq!(DistanceMetric::Euclidean.distance(a, b), 25);
        assert_eq!(DistanceMetric::Manhattan.distance(a, b), 7);
        assert_eq!(DistanceMetric::default(), DistanceMetric::Manhattan);
    }
}
