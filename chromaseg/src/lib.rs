//! chromaseg - Unsupervised color segmentation for Rust
//!
//! Reduces an RGB image to a small palette of representative colors and
//! labels every pixel with one of them. Segmentation runs in four phases:
//! greedy clustering, nearest-color refinement, morphological cleanup and
//! palette reduction.
//!
//! # Example
//!
//! ```
//! use chromaseg::{Rgb, RgbImage};
//! use chromaseg::color::{ColorSegmentOptions, color_segment};
//!
//! let image = RgbImage::from_fn(64, 48, |x, y| {
//!     if y < 24 { Rgb::new(220, 40, 40) } else if x < 32 { Rgb::WHITE } else { Rgb::BLACK }
//! })
//! .unwrap();
//! let seg = color_segment(&image, &ColorSegmentOptions::default()).unwrap();
//! assert_eq!(seg.palette.len(), 3);
//! assert_eq!(seg.palette.total_population(), 64 * 48);
//! ```

// Re-export core types (primary data structures used everywhere)
pub use chromaseg_core::*;

// Re-export domain crates as modules to avoid name conflicts
pub use chromaseg_color as color;
pub use chromaseg_morph as morph;
