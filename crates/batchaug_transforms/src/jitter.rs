//! Random-crop jitter.

use burn::prelude::*;
use ndarray::Array4;
use serde::{Deserialize, Serialize};

use batchaug_core::{
    DataFormat, ImageBatch, ImageTensorBatch, RandomSource, Result, Seed, Split, Transform,
};

use crate::glimpse::{extract_glimpse, GlimpseOptions, Offset};
use crate::pad::reflect_pad;
use crate::source::{passes, SharedSource};

/// Default reflect margin in pixels.
pub const DEFAULT_PAD: usize = 4;

/// Configuration for Jitter transform.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JitterConfig {
    /// Reflect margin, also the largest shift in either direction.
    pub pad: usize,
    /// Probability of applying jitter.
    pub p: f32,
}

impl Default for JitterConfig {
    fn default() -> Self {
        Self {
            pad: DEFAULT_PAD,
            p: 1.0,
        }
    }
}

/// Jitter with the default margin of 4 pixels.
pub fn jitter<R: RandomSource + ?Sized>(
    images: &Array4<f32>,
    format: DataFormat,
    rng: &mut R,
) -> Result<Array4<f32>> {
    jitter_with(images, format, &JitterConfig::default(), rng)
}

/// Shift every image by a random whole-pixel offset in `[-pad, pad]` on both
/// spatial axes.
///
/// Images are reflect-padded by `pad` and a centered window of the original
/// size is cut at the drawn offset, so the result has the input's shape and
/// contains only values from the input image. Offsets are drawn row then
/// column for each example in turn; an all-zero draw reproduces the input.
///
/// # Errors
///
/// Returns [`batchaug_core::CoreError::InvalidShape`] if `pad` is not smaller
/// than the image height and width.
pub fn jitter_with<R: RandomSource + ?Sized>(
    images: &Array4<f32>,
    format: DataFormat,
    config: &JitterConfig,
    rng: &mut R,
) -> Result<Array4<f32>> {
    format.dims(images).require_spatial_above(config.pad)?;

    let nhwc = format.to_nhwc(images);
    let (n, height, width, _) = nhwc.dim();
    let padded = reflect_pad(&nhwc, config.pad, config.pad)?;

    let pad = config.pad as i64;
    let offsets: Vec<Offset> = (0..n)
        .map(|_| {
            let row = rng.uniform_int(-pad, pad);
            let col = rng.uniform_int(-pad, pad);
            Offset::new(row as f32, col as f32)
        })
        .collect();

    let cropped = extract_glimpse(&padded, (height, width), &offsets, GlimpseOptions::centered())?;
    tracing::debug!(batch_size = n, pad = config.pad, "jitter");
    Ok(format.restore_from_nhwc(cropped))
}

/// Jitter the images of a labelled batch; labels pass through.
pub fn jitter_batch<R: RandomSource + ?Sized>(
    batch: &ImageBatch,
    config: &JitterConfig,
    rng: &mut R,
) -> Result<ImageBatch> {
    let images = jitter_with(batch.images(), batch.format(), config, rng)?;
    ImageBatch::new(batch.labels().clone(), images, batch.format())
}

/// Random-crop jitter transform.
///
/// Shifts images by up to `pad` pixels using reflect padding. Labels are
/// unchanged.
pub struct Jitter {
    config: JitterConfig,
    source: SharedSource,
}

impl Jitter {
    /// Create a new Jitter transform.
    #[must_use]
    pub fn new(pad: usize) -> Self {
        Self::from_config(JitterConfig {
            pad,
            ..Default::default()
        })
    }

    /// Create from config.
    #[must_use]
    pub fn from_config(config: JitterConfig) -> Self {
        Self {
            config,
            source: SharedSource::new(Seed::DEFAULT),
        }
    }

    /// Set the random seed.
    #[must_use]
    pub fn with_seed(mut self, seed: Seed) -> Self {
        self.source = SharedSource::new(seed);
        self
    }

    /// Set the application probability.
    #[must_use]
    pub fn with_probability(mut self, p: f32) -> Self {
        self.config.p = p;
        self
    }
}

impl Default for Jitter {
    fn default() -> Self {
        Self::from_config(JitterConfig::default())
    }
}

impl<B: Backend> Transform<B> for Jitter {
    fn apply(&self, batch: ImageTensorBatch<B>, split: Split) -> Result<ImageTensorBatch<B>> {
        if split.is_eval() {
            return Ok(batch);
        }

        let mut rng = self.source.lock();
        if !passes(self.config.p, &mut *rng) {
            return Ok(batch);
        }

        let device = batch.device();
        let shifted = jitter_batch(&batch.to_image_batch()?, &self.config, &mut *rng)?;
        Ok(ImageTensorBatch::from_image_batch(&shifted, &device))
    }

    fn name(&self) -> &str {
        "Jitter"
    }

    fn should_apply(&self, split: Split) -> bool {
        split.is_train()
    }
}
