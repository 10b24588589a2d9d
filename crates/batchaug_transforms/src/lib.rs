//! # batchaug_transforms
//!
//! Batch-wise image augmentations that build new labelled examples.
//!
//! This crate provides:
//! - Batch primitives (shuffle, permutations, random flips)
//! - Per-example glimpse extraction and reflect padding
//! - Label-mixing transforms (MixUp, RICAP)
//! - Random-crop jitter
//!
//! Every kernel takes its randomness from a [`batchaug_core::RandomSource`]
//! passed by the caller. The [`MixUp`], [`Ricap`] and [`Jitter`] structs wrap
//! the kernels as Burn [`batchaug_core::Transform`]s that own a seeded
//! source and only augment on the training split.
//!
//! ## Example
//!
//! ```rust,ignore
//! use batchaug_core::{Compose, Seed, Split, Transform};
//! use batchaug_transforms::{Jitter, MixUp};
//!
//! let pipeline = Compose::new()
//!     .add(Jitter::default().with_seed(Seed::new(1)))
//!     .add(MixUp::new(0.2).with_seed(Seed::new(2)));
//!
//! let batch = pipeline.apply(batch, Split::Train)?;
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod batch_ops;
pub mod glimpse;
pub mod jitter;
pub mod label_mix;
pub mod pad;
mod source;

pub use batch_ops::*;
pub use glimpse::*;
pub use jitter::*;
pub use label_mix::*;
pub use pad::*;
