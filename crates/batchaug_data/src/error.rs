//! Error types for batchaug_data.

use thiserror::Error;

/// Result type alias using [`DataError`].
pub type Result<T> = std::result::Result<T, DataError>;

/// Errors that can occur while batching data.
#[derive(Error, Debug)]
pub enum DataError {
    /// Batch size error.
    #[error("Invalid batch size: {0}")]
    InvalidBatchSize(String),

    /// Empty dataset.
    #[error("Dataset is empty")]
    EmptyDataset,

    /// Core error.
    #[error("Core error: {0}")]
    CoreError(#[from] batchaug_core::CoreError),
}
