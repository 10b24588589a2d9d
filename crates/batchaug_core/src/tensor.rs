//! Burn tensor batches.

use burn::prelude::*;
use ndarray::{Array2, Array4};

use crate::batch::ImageBatch;
use crate::error::{CoreError, Result};
use crate::layout::DataFormat;

/// A batch of labelled images held as Burn tensors.
///
/// This is the type passed through [`Transform`](crate::Transform)
/// pipelines. The augmentation kernels themselves run on [`ImageBatch`];
/// [`ImageTensorBatch::to_image_batch`] and
/// [`ImageTensorBatch::from_image_batch`] move data between the two.
///
/// # Example
///
/// ```rust,ignore
/// use batchaug_core::{DataFormat, ImageTensorBatch};
/// use burn::prelude::*;
///
/// let labels = Tensor::<NdArray, 2>::zeros([8, 10], &device);
/// let images = Tensor::<NdArray, 4>::zeros([8, 3, 32, 32], &device);
/// let batch = ImageTensorBatch::new(labels, images, DataFormat::Nchw)?;
/// ```
#[derive(Debug, Clone)]
pub struct ImageTensorBatch<B: Backend> {
    /// Class targets `[N, C]`.
    pub labels: Tensor<B, 2>,

    /// Images, laid out according to `format`.
    pub images: Tensor<B, 4>,

    /// Axis order of `images`.
    pub format: DataFormat,
}

impl<B: Backend> ImageTensorBatch<B> {
    /// Pair label and image tensors.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::ShapeMismatch`] if the leading axes differ.
    pub fn new(labels: Tensor<B, 2>, images: Tensor<B, 4>, format: DataFormat) -> Result<Self> {
        let labels_batch = labels.dims()[0];
        let images_batch = images.dims()[0];

        if labels_batch != images_batch {
            return Err(CoreError::ShapeMismatch(format!(
                "labels batch size {} != images batch size {}",
                labels_batch, images_batch
            )));
        }

        Ok(Self {
            labels,
            images,
            format,
        })
    }

    /// Get the batch size.
    #[must_use]
    pub fn batch_size(&self) -> usize {
        self.labels.dims()[0]
    }

    /// Get the device.
    pub fn device(&self) -> B::Device {
        self.images.device()
    }

    /// Copy the tensors into host arrays.
    ///
    /// # Errors
    ///
    /// Returns an error if the tensor data cannot be read as `f32`.
    pub fn to_image_batch(&self) -> Result<ImageBatch> {
        let [n, c] = self.labels.dims();
        let image_dims = self.images.dims();

        let labels_data = self.labels.clone().into_data();
        let labels_values: Vec<f32> = labels_data
            .as_slice()
            .map_err(|e| CoreError::ShapeMismatch(format!("Failed to get label data: {e:?}")))?
            .to_vec();

        let images_data = self.images.clone().into_data();
        let images_values: Vec<f32> = images_data
            .as_slice()
            .map_err(|e| CoreError::ShapeMismatch(format!("Failed to get image data: {e:?}")))?
            .to_vec();

        let labels = Array2::from_shape_vec((n, c), labels_values)?;
        let images = Array4::from_shape_vec(image_dims, images_values)?;

        ImageBatch::new(labels, images, self.format)
    }

    /// Build tensors on `device` from host arrays.
    pub fn from_image_batch(batch: &ImageBatch, device: &B::Device) -> Self {
        let labels_shape = batch.labels().dim();
        let images_shape = batch.images().dim();

        let labels_values: Vec<f32> = batch.labels().iter().copied().collect();
        let images_values: Vec<f32> = batch.images().iter().copied().collect();

        let labels: Tensor<B, 2> = Tensor::<B, 1>::from_floats(labels_values.as_slice(), device)
            .reshape([labels_shape.0, labels_shape.1]);
        let images: Tensor<B, 4> = Tensor::<B, 1>::from_floats(images_values.as_slice(), device)
            .reshape([images_shape.0, images_shape.1, images_shape.2, images_shape.3]);

        Self {
            labels,
            images,
            format: batch.format(),
        }
    }
}

#[cfg(all(test, feature = "backend-ndarray"))]
mod tests {
    use super::*;
    use crate::backend::NdArray;

    type TestBackend = NdArray;

    #[test]
    fn test_mismatched_tensors_rejected() {
        let device = Default::default();
        let labels = Tensor::<TestBackend, 2>::zeros([3, 4], &device);
        let images = Tensor::<TestBackend, 4>::zeros([2, 1, 4, 4], &device);
        assert!(ImageTensorBatch::new(labels, images, DataFormat::Nchw).is_err());
    }

    #[test]
    fn test_image_batch_round_trip() {
        let device = Default::default();
        let labels = Array2::from_shape_fn((2, 3), |(i, c)| (i * 3 + c) as f32);
        let images = Array4::from_shape_fn((2, 2, 3, 1), |(i, h, w, _)| (i * 10 + h * 3 + w) as f32);
        let batch = ImageBatch::new(labels, images, DataFormat::Nhwc).unwrap();

        let tensors = ImageTensorBatch::<TestBackend>::from_image_batch(&batch, &device);
        assert_eq!(tensors.batch_size(), 2);
        assert_eq!(tensors.images.dims(), [2, 2, 3, 1]);

        let restored = tensors.to_image_batch().unwrap();
        assert_eq!(restored, batch);
    }
}
