//! Batch-level primitives: permutations, shuffling, and axis flips.

use ndarray::{Array4, Axis};

use batchaug_core::{CoreError, ImageBatch, RandomSource, Result};

/// A bijection on `0..n` used to reorder the examples of a batch.
///
/// Applying a permutation gathers along the batch axis: example `i` of the
/// output is example `perm[i]` of the input, for labels and images alike.
///
/// # Example
///
/// ```rust
/// use batchaug_transforms::Permutation;
///
/// let perm = Permutation::from_indices(vec![2, 0, 1]).unwrap();
/// assert_eq!(perm.inverse().as_slice(), &[1, 2, 0]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Permutation(Vec<usize>);

impl Permutation {
    /// The identity ordering of `0..n`.
    #[must_use]
    pub fn identity(n: usize) -> Self {
        Self((0..n).collect())
    }

    /// Draw a uniformly random ordering of `0..n`.
    pub fn random<R: RandomSource + ?Sized>(n: usize, rng: &mut R) -> Self {
        Self(rng.permutation(n))
    }

    /// Wrap an explicit ordering.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidParameter`] unless `indices` contains each
    /// of `0..indices.len()` exactly once.
    pub fn from_indices(indices: Vec<usize>) -> Result<Self> {
        let n = indices.len();
        let mut seen = vec![false; n];
        for &i in &indices {
            if i >= n || seen[i] {
                return Err(CoreError::InvalidParameter(format!(
                    "{indices:?} is not a permutation of 0..{n}"
                )));
            }
            seen[i] = true;
        }
        Ok(Self(indices))
    }

    /// Number of elements permuted.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Check if the permutation is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The gather indices.
    #[must_use]
    pub fn as_slice(&self) -> &[usize] {
        &self.0
    }

    /// The permutation that undoes this one.
    #[must_use]
    pub fn inverse(&self) -> Self {
        let mut inv = vec![0; self.0.len()];
        for (dst, &src) in self.0.iter().enumerate() {
            inv[src] = dst;
        }
        Self(inv)
    }

    /// Reorder the examples of a batch.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::ShapeMismatch`] if the batch size differs from
    /// the permutation length.
    pub fn apply(&self, batch: &ImageBatch) -> Result<ImageBatch> {
        if batch.batch_size() != self.0.len() {
            return Err(CoreError::ShapeMismatch(format!(
                "permutation of {} applied to batch of {}",
                self.0.len(),
                batch.batch_size()
            )));
        }
        batch.select(&self.0)
    }
}

/// Shuffle a batch along its batch axis.
///
/// Labels and images are gathered with the same permutation, so pairs stay
/// together.
pub fn shuffle<R: RandomSource + ?Sized>(batch: &ImageBatch, rng: &mut R) -> Result<ImageBatch> {
    shuffle_with_permutation(batch, rng).map(|(shuffled, _)| shuffled)
}

/// Shuffle a batch and return the permutation that was applied.
pub fn shuffle_with_permutation<R: RandomSource + ?Sized>(
    batch: &ImageBatch,
    rng: &mut R,
) -> Result<(ImageBatch, Permutation)> {
    let perm = Permutation::random(batch.batch_size(), rng);
    let shuffled = perm.apply(batch)?;
    Ok((shuffled, perm))
}

/// Reverse `images` along `axis`.
///
/// # Errors
///
/// Returns [`CoreError::DimensionError`] if `axis` is not one of the four axes.
pub fn flip_axis(images: &Array4<f32>, axis: usize) -> Result<Array4<f32>> {
    check_axis(axis)?;
    let mut flipped = images.view();
    flipped.invert_axis(Axis(axis));
    Ok(flipped.as_standard_layout().into_owned())
}

/// Reverse `images` along `axis` with probability one half.
///
/// A single draw decides for the whole batch: the flip happens when the
/// draw exceeds `0.5`. Exactly one draw is consumed per call.
pub fn random_horizontal_flip<R: RandomSource + ?Sized>(
    images: &Array4<f32>,
    axis: usize,
    rng: &mut R,
) -> Result<Array4<f32>> {
    check_axis(axis)?;
    if rng.uniform_float() > 0.5 {
        flip_axis(images, axis)
    } else {
        Ok(images.clone())
    }
}

fn check_axis(axis: usize) -> Result<()> {
    if axis >= 4 {
        return Err(CoreError::DimensionError {
            expected: 4,
            got: axis,
        });
    }
    Ok(())
}
