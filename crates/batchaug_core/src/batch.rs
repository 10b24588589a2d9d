//! Paired label/image batches.

use ndarray::{Array2, Array4, Axis};

use crate::error::{CoreError, Result};
use crate::layout::{DataFormat, ImageDims};

/// A batch of labelled images.
///
/// Labels are `[N, C]` (one-hot or soft class vectors) and images are a 4D
/// array laid out according to [`DataFormat`]. Row `i` of the labels and
/// image `i` always describe the same example.
///
/// # Example
///
/// ```rust
/// use batchaug_core::{DataFormat, ImageBatch};
/// use ndarray::{Array2, Array4};
///
/// let labels = Array2::<f32>::eye(4);
/// let images = Array4::<f32>::zeros((4, 3, 32, 32));
/// let batch = ImageBatch::new(labels, images, DataFormat::Nchw).unwrap();
/// assert_eq!(batch.batch_size(), 4);
/// assert_eq!(batch.dims().height, 32);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct ImageBatch {
    labels: Array2<f32>,
    images: Array4<f32>,
    format: DataFormat,
}

impl ImageBatch {
    /// Pair labels with images.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::ShapeMismatch`] if the leading axes differ.
    pub fn new(labels: Array2<f32>, images: Array4<f32>, format: DataFormat) -> Result<Self> {
        let n_labels = labels.shape()[0];
        let n_images = images.shape()[0];
        if n_labels != n_images {
            return Err(CoreError::ShapeMismatch(format!(
                "labels batch size {} != images batch size {}",
                n_labels, n_images
            )));
        }

        Ok(Self {
            labels,
            images,
            format,
        })
    }

    /// Get the labels `[N, C]`.
    #[must_use]
    pub fn labels(&self) -> &Array2<f32> {
        &self.labels
    }

    /// Get the images.
    #[must_use]
    pub fn images(&self) -> &Array4<f32> {
        &self.images
    }

    /// Get the image layout.
    #[must_use]
    pub const fn format(&self) -> DataFormat {
        self.format
    }

    /// Number of examples.
    #[must_use]
    pub fn batch_size(&self) -> usize {
        self.labels.shape()[0]
    }

    /// Check if the batch has no examples.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.batch_size() == 0
    }

    /// Number of label columns.
    #[must_use]
    pub fn n_classes(&self) -> usize {
        self.labels.shape()[1]
    }

    /// Image geometry.
    #[must_use]
    pub fn dims(&self) -> ImageDims {
        self.format.dims(&self.images)
    }

    /// Images transposed to NHWC.
    #[must_use]
    pub fn images_nhwc(&self) -> Array4<f32> {
        self.format.to_nhwc(&self.images)
    }

    /// Return the same batch with images in another layout.
    #[must_use]
    pub fn to_format(&self, format: DataFormat) -> Self {
        if format == self.format {
            return self.clone();
        }
        Self {
            labels: self.labels.clone(),
            images: format.restore_from_nhwc(self.images_nhwc()),
            format,
        }
    }

    /// Gather examples along the batch axis.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::ShapeMismatch`] if any index is out of range.
    pub fn select(&self, indices: &[usize]) -> Result<Self> {
        let n = self.batch_size();
        if let Some(&bad) = indices.iter().find(|&&i| i >= n) {
            return Err(CoreError::ShapeMismatch(format!(
                "index {bad} out of range for batch of {n}"
            )));
        }
        Ok(Self {
            labels: self.labels.select(Axis(0), indices),
            images: self.images.select(Axis(0), indices),
            format: self.format,
        })
    }
}
