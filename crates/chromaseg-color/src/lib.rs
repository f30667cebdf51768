//! chromaseg-color - Unsupervised color segmentation
//!
//! Reduces an RGB image to a handful of representative colors and labels
//! every pixel with one of them:
//!
//! - **Greedy clustering** with automatic distance expansion
//! - **Octcube lookup** for fast nearest-color assignment
//! - **Morphological cleanup** of each cluster
//! - **Palette reduction** to the most populous clusters
//!
//! Enable the `threads` feature to run nearest-color assignment on the
//! rayon thread pool.

pub mod distance;
mod error;
pub mod octree;
pub mod segment;

pub use distance::{DistanceMetric, color_distance_sq, manhattan_distance};
pub use error::{ColorError, ColorResult};
pub use octree::{DEFAULT_OCTREE_LEVEL, LookupOptions, MAX_OCTREE_LEVEL, OctreeIndex};
pub use segment::{
    ClusterResult, ColorSegmentOptions, Segmentation, assign_to_nearest_color, color_segment,
    color_segment_cancellable, color_segment_clean, color_segment_cluster,
    color_segment_remove_colors, color_segment_simple, try_cluster,
};
