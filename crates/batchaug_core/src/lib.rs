//! # batchaug_core
//!
//! Core types and traits for batch-wise image augmentation.
//!
//! This crate provides:
//! - [`ImageBatch`], a labelled image batch with a checked batch-length invariant
//! - [`DataFormat`] for explicit NHWC / NCHW layouts
//! - [`RandomSource`] with the seeded [`SeededSource`] and the replaying [`ScriptedSource`]
//! - [`ImageTensorBatch`] and the [`Transform`] trait for Burn pipelines
//! - Error types and common utilities
//!
//! ## Layout Convention
//!
//! Labels are always `[N, C]`. Images are either `[N, H, W, C]`
//! ([`DataFormat::Nhwc`]) or `[N, C, H, W]` ([`DataFormat::Nchw`]); the layout
//! travels with the batch rather than being inferred from the shape.
//!
//! ## Example
//!
//! ```rust
//! use batchaug_core::{DataFormat, ImageBatch, Seed, SeededSource};
//! use ndarray::{Array2, Array4};
//!
//! let batch = ImageBatch::new(
//!     Array2::<f32>::eye(8),
//!     Array4::<f32>::zeros((8, 3, 32, 32)),
//!     DataFormat::Nchw,
//! )
//! .unwrap();
//! let mut source = SeededSource::new(Seed::new(42));
//! # let _ = (&batch, &mut source);
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]

mod batch;
mod error;
mod layout;
mod random;
mod seed;
mod split;
mod tensor;
mod transform;

pub use batch::ImageBatch;
pub use error::{CoreError, Result};
pub use layout::{DataFormat, ImageDims};
pub use random::{RandomSource, ScriptedSource, SeededSource};
pub use seed::Seed;
pub use split::Split;
pub use tensor::ImageTensorBatch;
pub use transform::{Compose, Identity, Transform};

/// Backend type aliases for convenience
pub mod backend {
    #[cfg(feature = "backend-ndarray")]
    pub use burn_ndarray::NdArray;
}
