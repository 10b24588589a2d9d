//! Label mixing transforms (MixUp, RICAP).
//!
//! Both transforms build synthetic examples from several shuffled copies of
//! a batch and blend the labels with the same weights used for the pixels.

use burn::prelude::*;
use ndarray::{concatenate, Array, Array2, Array4, Axis, RemoveAxis};
use serde::{Deserialize, Serialize};

use batchaug_core::{
    DataFormat, ImageBatch, ImageTensorBatch, RandomSource, Result, Seed, Split, Transform,
};

use crate::batch_ops::{random_horizontal_flip, shuffle};
use crate::glimpse::{extract_glimpse, GlimpseOptions, Offset};
use crate::source::{passes, SharedSource};

/// Default Beta shape parameter for both MixUp ratios and RICAP boundaries.
pub const DEFAULT_ALPHA: f32 = 0.2;

/// Spatial axis selector, resolved against a batch's [`DataFormat`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum SpatialAxis {
    /// Image rows.
    #[default]
    Height,
    /// Image columns.
    Width,
}

impl SpatialAxis {
    /// Array axis index in `format`.
    #[must_use]
    pub const fn index(&self, format: DataFormat) -> usize {
        match self {
            SpatialAxis::Height => format.height_axis(),
            SpatialAxis::Width => format.width_axis(),
        }
    }
}

/// Configuration for MixUp transform.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MixUpConfig {
    /// Alpha parameter of the symmetric Beta distribution.
    pub alpha: f32,
    /// Axis the partner batch is randomly flipped along.
    pub flip_axis: SpatialAxis,
    /// Probability of applying MixUp.
    pub p: f32,
}

impl Default for MixUpConfig {
    fn default() -> Self {
        Self {
            alpha: DEFAULT_ALPHA,
            flip_axis: SpatialAxis::Height,
            p: 1.0,
        }
    }
}

/// Draw `n` mixing ratios `max(λ, 1 - λ)` with `λ ~ Beta(alpha, alpha)`.
///
/// Folding keeps every ratio in `[0.5, 1]`, so each example stays the
/// majority contributor to its own mix.
pub fn mix_ratios<R: RandomSource + ?Sized>(n: usize, alpha: f32, rng: &mut R) -> Result<Vec<f32>> {
    (0..n)
        .map(|_| rng.beta(alpha, alpha).map(|lambda| lambda.max(1.0 - lambda)))
        .collect()
}

/// Per-example convex blend along axis 0: `ratio * own + (1 - ratio) * other`.
fn blend<D: RemoveAxis>(own: &Array<f32, D>, other: &Array<f32, D>, ratios: &[f32]) -> Array<f32, D> {
    let mut mixed = own.clone();
    for ((mut row, other_row), &ratio) in mixed.outer_iter_mut().zip(other.outer_iter()).zip(ratios) {
        row.zip_mut_with(&other_row, |a, &b| *a = ratio * *a + (1.0 - ratio) * b);
    }
    mixed
}

/// MixUp with the default configuration.
pub fn mixup<R: RandomSource + ?Sized>(batch: &ImageBatch, rng: &mut R) -> Result<ImageBatch> {
    mixup_with(batch, &MixUpConfig::default(), rng)
}

/// Blend every example with a partner from a shuffled, randomly flipped copy
/// of the batch.
///
/// Draws, in order: one permutation, one flip decision, then one Beta sample
/// per example. The ratio applied to example `i`'s labels is the same one
/// applied to its pixels. `config.p` is not consulted here; it gates the
/// [`MixUp`] transform.
pub fn mixup_with<R: RandomSource + ?Sized>(
    batch: &ImageBatch,
    config: &MixUpConfig,
    rng: &mut R,
) -> Result<ImageBatch> {
    let format = batch.format();
    let n = batch.batch_size();

    let partner = shuffle(batch, rng)?;
    let partner_images =
        random_horizontal_flip(partner.images(), config.flip_axis.index(format), rng)?;
    let ratios = mix_ratios(n, config.alpha, rng)?;

    let labels = blend(batch.labels(), partner.labels(), &ratios);
    let images = blend(batch.images(), &partner_images, &ratios);

    tracing::debug!(batch_size = n, alpha = config.alpha, "mixup");
    ImageBatch::new(labels, images, format)
}

/// Configuration for RICAP transform.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RicapConfig {
    /// Alpha parameter of the Beta distribution for the patch boundaries.
    pub alpha: f32,
    /// Probability of applying RICAP.
    pub p: f32,
}

impl Default for RicapConfig {
    fn default() -> Self {
        Self {
            alpha: DEFAULT_ALPHA,
            p: 1.0,
        }
    }
}

/// One of the four RICAP patches.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Quadrant {
    /// Patch height in pixels.
    pub height: usize,
    /// Patch width in pixels.
    pub width: usize,
    /// Share of the output image covered by this patch.
    pub fraction: f32,
}

impl Quadrant {
    /// Pixel area of the patch.
    #[must_use]
    pub const fn area(&self) -> usize {
        self.height * self.width
    }
}

/// Patch sizes for boundary `(h, w)` in a `height x width` image.
///
/// Returned in source order: `(h, w)`, `(height - h, w)`, `(h, width - w)`,
/// `(height - h, width - w)`. Boundaries beyond the image are clamped to it.
/// The fractions sum to one for any non-empty image; a zero-sized patch has
/// fraction zero.
#[must_use]
pub fn quadrant_layout(h: usize, w: usize, height: usize, width: usize) -> [Quadrant; 4] {
    let h = h.min(height);
    let w = w.min(width);
    let area = (height * width) as f32;
    let make = |qh: usize, qw: usize| Quadrant {
        height: qh,
        width: qw,
        fraction: if area > 0.0 { (qh * qw) as f32 / area } else { 0.0 },
    };

    [
        make(h, w),
        make(height - h, w),
        make(h, width - w),
        make(height - h, width - w),
    ]
}

fn boundary(sample: f32, extent: usize) -> usize {
    ((sample * extent as f32).round() as usize).min(extent)
}

/// Draw one patch center per example so the patch fits inside the image.
///
/// Rows come from `[ceil(qh/2), height - ceil(qh/2)]` and columns likewise,
/// drawn row then column for each example in turn.
fn quadrant_offsets<R: RandomSource + ?Sized>(
    quadrant: &Quadrant,
    height: usize,
    width: usize,
    n: usize,
    rng: &mut R,
) -> Vec<Offset> {
    let border_h = quadrant.height.div_ceil(2) as i64;
    let border_w = quadrant.width.div_ceil(2) as i64;

    (0..n)
        .map(|_| {
            let row = rng.uniform_int(border_h, height as i64 - border_h);
            let col = rng.uniform_int(border_w, width as i64 - border_w);
            Offset::new(row as f32, col as f32)
        })
        .collect()
}

/// RICAP with the default configuration.
pub fn ricap<R: RandomSource + ?Sized>(batch: &ImageBatch, rng: &mut R) -> Result<ImageBatch> {
    ricap_with(batch, &RicapConfig::default(), rng)
}

/// Random Image Cropping And Patching.
///
/// Each output image is tiled from four patches. Each patch is cut from a
/// different source: the batch itself and three shuffled copies, each
/// flipped along the width with its own draw. A boundary `(h, w)` is drawn
/// once for the whole batch. Each patch is cut at an independent random
/// position per example. Labels are blended by patch area.
///
/// The output keeps the input's shape and [`DataFormat`].
///
/// # Errors
///
/// Returns [`batchaug_core::CoreError::InvalidShape`] for images with zero height or width,
/// and propagates invalid Beta parameters.
pub fn ricap_with<R: RandomSource + ?Sized>(
    batch: &ImageBatch,
    config: &RicapConfig,
    rng: &mut R,
) -> Result<ImageBatch> {
    let format = batch.format();
    let dims = batch.dims();
    dims.require_spatial_above(0)?;

    let canonical = batch.to_format(DataFormat::Nhwc);
    let mut sources = Vec::with_capacity(4);
    sources.push(canonical.clone());
    for _ in 0..3 {
        sources.push(shuffle(&canonical, rng)?);
    }

    let width_axis = DataFormat::Nhwc.width_axis();
    let images = sources
        .iter()
        .map(|source| random_horizontal_flip(source.images(), width_axis, rng))
        .collect::<Result<Vec<Array4<f32>>>>()?;

    let h = boundary(rng.beta(config.alpha, config.alpha)?, dims.height);
    let w = boundary(rng.beta(config.alpha, config.alpha)?, dims.width);
    let quadrants = quadrant_layout(h, w, dims.height, dims.width);
    tracing::debug!(h, w, height = dims.height, width = dims.width, "ricap boundaries");

    let mut patches = Vec::with_capacity(4);
    for (quadrant, source_images) in quadrants.iter().zip(&images) {
        let offsets = quadrant_offsets(quadrant, dims.height, dims.width, dims.batch, rng);
        patches.push(extract_glimpse(
            source_images,
            (quadrant.height, quadrant.width),
            &offsets,
            GlimpseOptions::absolute(),
        )?);
    }

    // Quadrants 0/1 stack into the right strip (width w), 2/3 into the left.
    let right = concatenate(Axis(1), &[patches[0].view(), patches[1].view()])?;
    let left = concatenate(Axis(1), &[patches[2].view(), patches[3].view()])?;
    let tiled = concatenate(Axis(2), &[left.view(), right.view()])?;

    let mut labels = Array2::<f32>::zeros(canonical.labels().raw_dim());
    for (quadrant, source) in quadrants.iter().zip(&sources) {
        labels.scaled_add(quadrant.fraction, source.labels());
    }

    ImageBatch::new(labels, format.restore_from_nhwc(tiled), format)
}

/// MixUp augmentation for labelled image batches.
///
/// Mixes every example with a shuffled, randomly flipped partner:
/// x' = λ * x1 + (1 - λ) * x2
/// y' = λ * y1 + (1 - λ) * y2
///
/// where λ = max(u, 1 - u), u ~ Beta(alpha, alpha), drawn per example.
///
/// # Example
///
/// ```rust,ignore
/// use batchaug_transforms::MixUp;
/// use batchaug_core::{Seed, Split, Transform};
///
/// let mixup = MixUp::new(0.2).with_seed(Seed::new(42));
/// let mixed = mixup.apply(batch, Split::Train)?;
/// ```
pub struct MixUp {
    config: MixUpConfig,
    source: SharedSource,
}

impl MixUp {
    /// Create a new MixUp transform.
    #[must_use]
    pub fn new(alpha: f32) -> Self {
        Self::from_config(MixUpConfig {
            alpha,
            ..Default::default()
        })
    }

    /// Create from config.
    #[must_use]
    pub fn from_config(config: MixUpConfig) -> Self {
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

    /// Set the axis the partner batch is flipped along.
    #[must_use]
    pub fn with_flip_axis(mut self, axis: SpatialAxis) -> Self {
        self.config.flip_axis = axis;
        self
    }

    /// Get the configuration.
    #[must_use]
    pub fn config(&self) -> &MixUpConfig {
        &self.config
    }
}

impl Default for MixUp {
    fn default() -> Self {
        Self::from_config(MixUpConfig::default())
    }
}

impl<B: Backend> Transform<B> for MixUp {
    fn apply(&self, batch: ImageTensorBatch<B>, split: Split) -> Result<ImageTensorBatch<B>> {
        if split.is_eval() {
            return Ok(batch);
        }

        let mut rng = self.source.lock();
        if !passes(self.config.p, &mut *rng) {
            return Ok(batch);
        }

        let device = batch.device();
        let mixed = mixup_with(&batch.to_image_batch()?, &self.config, &mut *rng)?;
        Ok(ImageTensorBatch::from_image_batch(&mixed, &device))
    }

    fn name(&self) -> &str {
        "MixUp"
    }

    fn should_apply(&self, split: Split) -> bool {
        split.is_train()
    }
}

/// RICAP augmentation for labelled image batches.
///
/// Tiles each output image from four patches of four differently shuffled
/// copies of the batch and blends labels by patch area.
pub struct Ricap {
    config: RicapConfig,
    source: SharedSource,
}

impl Ricap {
    /// Create a new RICAP transform.
    #[must_use]
    pub fn new(alpha: f32) -> Self {
        Self::from_config(RicapConfig {
            alpha,
            ..Default::default()
        })
    }

    /// Create from config.
    #[must_use]
    pub fn from_config(config: RicapConfig) -> Self {
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

    /// Get the configuration.
    #[must_use]
    pub fn config(&self) -> &RicapConfig {
        &self.config
    }
}

impl Default for Ricap {
    fn default() -> Self {
        Self::from_config(RicapConfig::default())
    }
}

impl<B: Backend> Transform<B> for Ricap {
    fn apply(&self, batch: ImageTensorBatch<B>, split: Split) -> Result<ImageTensorBatch<B>> {
        if split.is_eval() {
            return Ok(batch);
        }

        let mut rng = self.source.lock();
        if !passes(self.config.p, &mut *rng) {
            return Ok(batch);
        }

        let device = batch.device();
        let patched = ricap_with(&batch.to_image_batch()?, &self.config, &mut *rng)?;
        Ok(ImageTensorBatch::from_image_batch(&patched, &device))
    }

    fn name(&self) -> &str {
        "Ricap"
    }

    fn should_apply(&self, split: Split) -> bool {
        split.is_train()
    }
}
