//! Error types for the test harness

use thiserror::Error;

/// Errors reported by [`RegParams::check`](crate::RegParams::check)
#[derive(Debug, Clone, Error)]
pub enum TestError {
    /// Value comparison failed
    #[error(
        "value comparison failed at index {index}: expected {expected}, got {actual}, delta {delta}"
    )]
    ValueMismatch {
        index: usize,
        expected: f64,
        actual: f64,
        delta: f64,
    },

    /// Label image comparison failed
    #[error("label comparison failed at index {index}: first difference at ({x}, {y})")]
    LabelMismatch { index: usize, x: u32, y: u32 },

    /// Label images differ in size
    #[error("label comparison failed at index {index}: size mismatch")]
    SizeMismatch { index: usize },
}

/// Result type for test harness operations
pub type TestResult<T> = Result<T, TestError>;
