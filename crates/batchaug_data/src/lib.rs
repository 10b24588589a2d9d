//! # batchaug_data
//!
//! Batching utilities for in-memory image sets.
//!
//! This crate provides:
//! - [`make_batches`] for cutting a labelled image set into fixed-size batches
//! - [`ImageDataLoader`] for per-epoch iteration with seeded shuffling
//!
//! ## Example
//!
//! ```rust,ignore
//! use batchaug_data::ImageDataLoader;
//! use batchaug_core::Seed;
//!
//! let mut loader = ImageDataLoader::builder(train)
//!     .batch_size(128)
//!     .shuffle(true)
//!     .seed(Seed::new(42))
//!     .build()?;
//! let batches = loader.epoch()?;
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]

mod error;
mod loader;

pub use error::{DataError, Result};
pub use loader::{make_batches, ImageDataLoader, ImageDataLoaderBuilder};
