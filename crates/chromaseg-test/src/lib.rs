//! chromaseg-test - Regression test harness
//!
//! Each regression test creates a [`RegParams`], feeds it numbered
//! comparisons and asserts on [`RegParams::cleanup`] at the end. Failures
//! are collected rather than panicking immediately, so one run reports
//! every mismatch.
//!
//! # Usage
//!
//! ```ignore
//! use chromaseg_test::RegParams;
//!
//! let mut rp = RegParams::new("colorseg");
//! rp.compare_values(4.0, palette.len() as f64, 0.0);
//! assert!(rp.cleanup());
//! ```
//!
//! # Environment Variables
//!
//! - `REGTEST_MODE`: `compare` (default) or `display`. Display mode also
//!   prints every compared label image.

mod error;
mod params;

pub use error::{TestError, TestResult};
pub use params::{RegParams, RegTestMode};
