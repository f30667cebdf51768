//! Error types for chromaseg-core
//!
//! A single error type covers construction and access failures of the
//! raster and palette containers. Domain crates wrap it with `#[from]`.

use thiserror::Error;

/// chromaseg core error type
#[derive(Error, Debug)]
pub enum Error {
    /// Invalid image dimensions
    #[error("invalid image dimensions: {width}x{height}")]
    InvalidDimension { width: u32, height: u32 },

    /// Image dimension mismatch
    #[error("dimension mismatch: expected {}x{}, got {}x{}", .expected.0, .expected.1, .actual.0, .actual.1)]
    DimensionMismatch {
        expected: (u32, u32),
        actual: (u32, u32),
    },

    /// Index out of bounds
    #[error("index out of bounds: {index} >= {len}")]
    IndexOutOfBounds { index: usize, len: usize },

    /// Invalid parameter value
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// Palette is already at its capacity
    #[error("palette full: at most {max} entries")]
    PaletteFull { max: usize },
}

/// Result type alias for core operations
pub type Result<T> = std::result::Result<T, Error>;
