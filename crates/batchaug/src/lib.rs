//! # batchaug
//!
//! Batch-wise image augmentation for classifier training.
//!
//! batchaug builds new labelled training examples from whole batches:
//!
//! - **Batch primitives**: shuffling, random flips, fixed-size batching
//! - **MixUp**: per-example convex blends of images and labels
//! - **RICAP**: four-patch image collages with area-weighted labels
//! - **Jitter**: reflect-padded random crops
//!
//! Kernels work on [`core::ImageBatch`] (ndarray) and draw from an explicit
//! [`core::RandomSource`]. The [`transforms::MixUp`], [`transforms::Ricap`]
//! and [`transforms::Jitter`] wrappers plug into Burn pipelines through
//! [`core::Transform`].
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use batchaug::prelude::*;
//!
//! let mut loader = ImageDataLoader::builder(train)
//!     .batch_size(128)
//!     .shuffle(true)
//!     .seed(Seed::new(42))
//!     .build()?;
//!
//! let mut rng = SeededSource::new(Seed::new(250));
//! for batch in loader.epoch()? {
//!     let batch = ricap(&jitter_batch(&batch, &JitterConfig::default(), &mut rng)?, &mut rng)?;
//!     // train on batch
//! }
//! ```
//!
//! ## Feature Flags
//!
//! - `backend-ndarray` (default): CPU backend using ndarray

#![deny(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]

// Re-export all crates
pub use batchaug_core as core;
pub use batchaug_data as data;
pub use batchaug_transforms as transforms;

/// Prelude module for convenient imports.
///
/// ```rust,ignore
/// use batchaug::prelude::*;
/// ```
pub mod prelude {
    // Core types
    pub use batchaug_core::{
        Compose, CoreError, DataFormat, Identity, ImageBatch, ImageTensorBatch, RandomSource,
        Result, ScriptedSource, Seed, SeededSource, Split, Transform,
    };

    // Data
    pub use batchaug_data::{make_batches, DataError, ImageDataLoader};

    // Transforms
    pub use batchaug_transforms::{
        extract_glimpse, jitter, jitter_batch, mixup, random_horizontal_flip, ricap, shuffle,
        GlimpseOptions, Jitter, JitterConfig, MixUp, MixUpConfig, Offset, Permutation, Ricap,
        RicapConfig, SpatialAxis,
    };
}

/// All module for importing everything.
pub mod all {
    pub use super::prelude::*;

    // Additional exports
    pub use batchaug_core::{backend, ImageDims};
    pub use batchaug_data::ImageDataLoaderBuilder;
    pub use batchaug_transforms::{
        flip_axis, jitter_with, mix_ratios, mixup_with, quadrant_layout, reflect_pad, ricap_with,
        shuffle_with_permutation, FillMode, Quadrant,
    };
}
