//! Image data layouts.

use ndarray::Array4;
use serde::{Deserialize, Serialize};

use crate::error::{CoreError, Result};

/// Axis order of a 4D image array.
///
/// Augmentation kernels work on [`DataFormat::Nhwc`]; batches in
/// [`DataFormat::Nchw`] are transposed on the way in and back on the way out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum DataFormat {
    /// `[batch, height, width, channels]`.
    #[default]
    Nhwc,
    /// `[batch, channels, height, width]`.
    Nchw,
}

impl DataFormat {
    /// Index of the height axis.
    #[must_use]
    pub const fn height_axis(&self) -> usize {
        match self {
            DataFormat::Nhwc => 1,
            DataFormat::Nchw => 2,
        }
    }

    /// Index of the width axis.
    #[must_use]
    pub const fn width_axis(&self) -> usize {
        match self {
            DataFormat::Nhwc => 2,
            DataFormat::Nchw => 3,
        }
    }

    /// Index of the channel axis.
    #[must_use]
    pub const fn channel_axis(&self) -> usize {
        match self {
            DataFormat::Nhwc => 3,
            DataFormat::Nchw => 1,
        }
    }

    /// Read the image geometry of an array laid out in this format.
    #[must_use]
    pub fn dims(&self, images: &Array4<f32>) -> ImageDims {
        let shape = images.shape();
        ImageDims {
            batch: shape[0],
            height: shape[self.height_axis()],
            width: shape[self.width_axis()],
            channels: shape[self.channel_axis()],
        }
    }

    /// Transpose an array in this format to NHWC.
    #[must_use]
    pub fn to_nhwc(self, images: &Array4<f32>) -> Array4<f32> {
        match self {
            DataFormat::Nhwc => images.clone(),
            DataFormat::Nchw => images
                .view()
                .permuted_axes([0, 2, 3, 1])
                .as_standard_layout()
                .into_owned(),
        }
    }

    /// Transpose an NHWC array into this format.
    #[must_use]
    pub fn restore_from_nhwc(self, images: Array4<f32>) -> Array4<f32> {
        match self {
            DataFormat::Nhwc => images,
            DataFormat::Nchw => images
                .permuted_axes([0, 3, 1, 2])
                .as_standard_layout()
                .into_owned(),
        }
    }
}

impl std::fmt::Display for DataFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DataFormat::Nhwc => write!(f, "NHWC"),
            DataFormat::Nchw => write!(f, "NCHW"),
        }
    }
}

/// Geometry of an image batch, independent of layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ImageDims {
    /// Number of examples.
    pub batch: usize,
    /// Image height in pixels.
    pub height: usize,
    /// Image width in pixels.
    pub width: usize,
    /// Number of channels.
    pub channels: usize,
}

impl ImageDims {
    /// Pixel area of one image.
    #[must_use]
    pub const fn area(&self) -> usize {
        self.height * self.width
    }

    /// Shape of an array with these dims in the given format.
    #[must_use]
    pub const fn shape(&self, format: DataFormat) -> [usize; 4] {
        match format {
            DataFormat::Nhwc => [self.batch, self.height, self.width, self.channels],
            DataFormat::Nchw => [self.batch, self.channels, self.height, self.width],
        }
    }

    /// Fail unless both spatial extents exceed `min`.
    pub fn require_spatial_above(&self, min: usize) -> Result<()> {
        if self.height <= min || self.width <= min {
            return Err(CoreError::InvalidShape {
                expected: format!("height and width greater than {min}"),
                got: format!("{}x{}", self.height, self.width),
            });
        }
        Ok(())
    }
}

impl std::fmt::Display for ImageDims {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "(N={}, H={}, W={}, C={})",
            self.batch, self.height, self.width, self.channels
        )
    }
}
