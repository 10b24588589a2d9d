//! Error types for batchaug_core.

use thiserror::Error;

/// Result type alias using [`CoreError`].
pub type Result<T> = std::result::Result<T, CoreError>;

/// Core errors that can occur in batch and augmentation operations.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Invalid array shape provided.
    #[error("Invalid shape: expected {expected}, got {got}")]
    InvalidShape {
        /// Expected shape description.
        expected: String,
        /// Actual shape description.
        got: String,
    },

    /// Shape mismatch between paired arrays.
    #[error("Shape mismatch: {0}")]
    ShapeMismatch(String),

    /// Axis or rank error.
    #[error("Dimension error: expected {expected} dimensions, got {got}")]
    DimensionError {
        /// Expected number of dimensions (or axis bound).
        expected: usize,
        /// Actual number of dimensions (or requested axis).
        got: usize,
    },

    /// A distribution or transform parameter is out of its valid range.
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),
}

impl From<ndarray::ShapeError> for CoreError {
    fn from(err: ndarray::ShapeError) -> Self {
        CoreError::ShapeMismatch(err.to_string())
    }
}
