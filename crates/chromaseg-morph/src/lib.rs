//! chromaseg-morph - Binary morphology on packed masks
//!
//! Brick (rectangular) structuring elements only, which is what region
//! cleanup in color segmentation needs:
//!
//! - [`dilate_brick`] / [`erode_brick`]: separable, word-level rasterop
//! - [`close_brick`]: dilation followed by erosion
//! - [`close_safe_brick`]: closing on a zero-padded copy, so content near
//!   the image edge is not eroded away

pub mod binary;
mod error;

pub use binary::{close_brick, close_safe_brick, dilate_brick, erode_brick};
pub use error::{MorphError, MorphResult};
