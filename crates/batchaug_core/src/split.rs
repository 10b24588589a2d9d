//! Data split types.

use serde::{Deserialize, Serialize};

/// Which stage of training a batch belongs to.
///
/// Augmentations regularize training only, so every transform in this
/// workspace passes [`Split::Valid`] and [`Split::Test`] batches through
/// untouched.
///
/// # Example
///
/// ```rust
/// use batchaug_core::Split;
///
/// assert!(Split::Train.is_train());
/// assert!(Split::Test.is_eval());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Split {
    /// Training batches; augmentations apply.
    #[default]
    Train,
    /// Validation batches.
    Valid,
    /// Test batches.
    Test,
}

impl Split {
    /// Check if this is the training split.
    #[must_use]
    pub const fn is_train(&self) -> bool {
        matches!(self, Split::Train)
    }

    /// Check if this is an evaluation split (valid or test).
    #[must_use]
    pub const fn is_eval(&self) -> bool {
        matches!(self, Split::Valid | Split::Test)
    }
}

impl std::fmt::Display for Split {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Split::Train => write!(f, "train"),
            Split::Valid => write!(f, "valid"),
            Split::Test => write!(f, "test"),
        }
    }
}
