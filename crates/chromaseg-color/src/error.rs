//! Error types for chromaseg-color

use thiserror::Error;

/// Errors that can occur during color segmentation
#[derive(Debug, Error)]
pub enum ColorError {
    /// Core library error
    #[error("core error: {0}")]
    Core(#[from] chromaseg_core::Error),

    /// Morphology error
    #[error("morphology error: {0}")]
    Morph(#[from] chromaseg_morph::MorphError),

    /// Invalid parameters
    #[error("invalid parameters: {0}")]
    InvalidParameters(String),

    /// Greedy clustering needed more than `max_colors` clusters at the
    /// current distance threshold
    #[error("too many colors: more than {max_colors} clusters at max_dist {max_dist}")]
    TooManyColors { max_colors: u32, max_dist: f32 },

    /// The distance expansion loop ran out of attempts
    #[error("clustering did not converge after {iterations} attempts (final max_dist {max_dist})")]
    ConvergenceFailure { iterations: u32, max_dist: f32 },

    /// Nearest-color lookup requested over a palette with no entries
    #[error("empty palette: no colors to search")]
    EmptyPalette,

    /// The caller cancelled the run between clustering attempts
    #[error("cancelled after {iterations} clustering attempts")]
    Cancelled { iterations: u32 },
}

/// Result type for color segmentation operations
pub type ColorResult<T> = Result<T, ColorError>;
