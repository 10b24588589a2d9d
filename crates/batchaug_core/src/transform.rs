//! Transform trait for batch augmentation.

use burn::prelude::*;

use crate::error::Result;
use crate::split::Split;
use crate::tensor::ImageTensorBatch;

/// A transform applied to batches of labelled images.
///
/// # Implementation Notes
///
/// - Transforms draw from their own random source, so a fixed seed and a
///   fixed sequence of calls reproduce the same output
/// - Transforms return `Result` instead of panicking
/// - Output batches keep the input's shape and layout
///
/// # Example
///
/// ```rust,ignore
/// use batchaug_core::{ImageTensorBatch, Result, Split, Transform};
/// use burn::prelude::*;
///
/// struct Invert;
///
/// impl<B: Backend> Transform<B> for Invert {
///     fn apply(&self, mut batch: ImageTensorBatch<B>, split: Split) -> Result<ImageTensorBatch<B>> {
///         if split.is_eval() {
///             return Ok(batch);
///         }
///         batch.images = batch.images.neg().add_scalar(1.0);
///         Ok(batch)
///     }
/// }
/// ```
pub trait Transform<B: Backend>: Send + Sync {
    /// Apply the transform to a batch.
    fn apply(&self, batch: ImageTensorBatch<B>, split: Split) -> Result<ImageTensorBatch<B>>;

    /// Get the name of this transform for logging/debugging.
    fn name(&self) -> &str {
        std::any::type_name::<Self>()
    }

    /// Check if this transform should be applied for the given split.
    fn should_apply(&self, _split: Split) -> bool {
        true
    }
}

/// Identity transform that passes batches through unchanged.
#[derive(Debug, Clone, Default)]
pub struct Identity;

impl<B: Backend> Transform<B> for Identity {
    fn apply(&self, batch: ImageTensorBatch<B>, _split: Split) -> Result<ImageTensorBatch<B>> {
        Ok(batch)
    }

    fn name(&self) -> &str {
        "Identity"
    }
}

/// A composed transform that applies multiple transforms in sequence.
pub struct Compose<B: Backend> {
    transforms: Vec<Box<dyn Transform<B>>>,
}

impl<B: Backend> Default for Compose<B> {
    fn default() -> Self {
        Self::new()
    }
}

impl<B: Backend> Compose<B> {
    /// Create a new empty composition.
    #[must_use]
    pub fn new() -> Self {
        Self {
            transforms: Vec::new(),
        }
    }

    /// Append a transform, builder style.
    #[must_use]
    pub fn add<T: Transform<B> + 'static>(mut self, transform: T) -> Self {
        self.push(transform);
        self
    }

    /// Append a transform.
    pub fn push<T: Transform<B> + 'static>(&mut self, transform: T) {
        self.transforms.push(Box::new(transform));
    }

    /// Number of transforms in the composition.
    #[must_use]
    pub fn len(&self) -> usize {
        self.transforms.len()
    }

    /// Check if the composition is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.transforms.is_empty()
    }
}

impl<B: Backend> Transform<B> for Compose<B> {
    fn apply(&self, mut batch: ImageTensorBatch<B>, split: Split) -> Result<ImageTensorBatch<B>> {
        for transform in &self.transforms {
            if transform.should_apply(split) {
                batch = transform.apply(batch, split)?;
            }
        }
        Ok(batch)
    }

    fn name(&self) -> &str {
        "Compose"
    }
}
