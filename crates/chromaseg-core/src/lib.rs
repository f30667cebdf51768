//! chromaseg core - raster and palette types for color segmentation
//!
//! This crate provides the data structures shared by the segmentation
//! pipeline:
//!
//! - [`Rgb`] - A 24-bit color, with packed `0xRRGGBBAA` conversions
//! - [`RgbImage`] - The read-only source raster
//! - [`LabelImage`] - Per-pixel palette indices
//! - [`BinaryMask`] - Packed 1-bit raster used for masks and morphology
//! - [`Palette`] / [`Cluster`] - Representative colors and their populations

pub mod color;
pub mod error;
pub mod image;
pub mod label;
pub mod mask;
pub mod palette;

pub use color::Rgb;
pub use error::{Error, Result};
pub use image::RgbImage;
pub use label::LabelImage;
pub use mask::BinaryMask;
pub use palette::{Cluster, MAX_PALETTE_SIZE, Palette};
