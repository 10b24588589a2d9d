//! Random sources for augmentation draws.
//!
//! Every augmentation takes its randomness from a [`RandomSource`] passed by
//! mutable reference. [`SeededSource`] is the production stream; it advances
//! with every draw and never resets. [`ScriptedSource`] replays fixed draws so
//! a specific flip, offset, or mixing ratio can be forced.

use std::collections::VecDeque;

use rand::prelude::*;
use rand_chacha::ChaCha8Rng;
use rand_distr::Beta;

use crate::error::{CoreError, Result};
use crate::seed::Seed;

/// A stream of augmentation draws.
///
/// Implementations are not expected to be thread-safe; callers that share a
/// source across threads wrap it in a lock.
pub trait RandomSource {
    /// A float uniformly distributed in `[0, 1)`.
    fn uniform_float(&mut self) -> f32;

    /// An integer uniformly distributed in `[low, high]` (inclusive).
    ///
    /// If `high < low` the range collapses to `low`.
    fn uniform_int(&mut self, low: i64, high: i64) -> i64;

    /// A sample from `Beta(alpha, beta)` in `[0, 1]`.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidParameter`] if either shape parameter is
    /// not a finite positive number.
    fn beta(&mut self, alpha: f32, beta: f32) -> Result<f32>;

    /// A uniformly random ordering of `0..n`.
    ///
    /// The default implementation is a Fisher-Yates shuffle driven by
    /// [`uniform_int`](Self::uniform_int).
    fn permutation(&mut self, n: usize) -> Vec<usize> {
        let mut indices: Vec<usize> = (0..n).collect();
        for i in (1..n).rev() {
            let j = self.uniform_int(0, i as i64) as usize;
            indices.swap(i, j);
        }
        indices
    }
}

fn check_beta_params(alpha: f32, beta: f32) -> Result<()> {
    let valid = |v: f32| v.is_finite() && v > 0.0;
    if !valid(alpha) || !valid(beta) {
        return Err(CoreError::InvalidParameter(format!(
            "Beta distribution requires finite positive parameters, got alpha={alpha}, beta={beta}"
        )));
    }
    Ok(())
}

/// Seeded ChaCha8 random source.
///
/// # Example
///
/// ```rust
/// use batchaug_core::{RandomSource, Seed, SeededSource};
///
/// let mut a = SeededSource::new(Seed::new(7));
/// let mut b = SeededSource::new(Seed::new(7));
/// assert_eq!(a.uniform_int(-4, 4), b.uniform_int(-4, 4));
/// ```
#[derive(Debug, Clone)]
pub struct SeededSource {
    rng: ChaCha8Rng,
}

impl SeededSource {
    /// Create a source from a seed.
    #[must_use]
    pub fn new(seed: Seed) -> Self {
        Self { rng: seed.to_rng() }
    }

    /// Create a source seeded from the system clock.
    #[must_use]
    pub fn from_entropy() -> Self {
        Self::new(Seed::from_entropy())
    }
}

impl Default for SeededSource {
    fn default() -> Self {
        Self::new(Seed::DEFAULT)
    }
}

impl RandomSource for SeededSource {
    fn uniform_float(&mut self) -> f32 {
        self.rng.gen::<f32>()
    }

    fn uniform_int(&mut self, low: i64, high: i64) -> i64 {
        if high <= low {
            return low;
        }
        self.rng.gen_range(low..=high)
    }

    fn beta(&mut self, alpha: f32, beta: f32) -> Result<f32> {
        check_beta_params(alpha, beta)?;
        let dist = Beta::new(alpha, beta)
            .map_err(|e| CoreError::InvalidParameter(format!("Beta({alpha}, {beta}): {e}")))?;
        Ok(dist.sample(&mut self.rng).clamp(0.0, 1.0))
    }

    fn permutation(&mut self, n: usize) -> Vec<usize> {
        let mut indices: Vec<usize> = (0..n).collect();
        indices.shuffle(&mut self.rng);
        indices
    }
}

/// A source that replays scripted draws.
///
/// Each kind of draw has its own queue. When a queue runs dry the source
/// falls back to a neutral value: `0.0` for floats, `0` clamped into the
/// requested range for integers, `0.5` for Beta samples, and the identity
/// ordering for permutations. Scripted integers are clamped into the
/// requested range and scripted permutations of the wrong length are
/// replaced by the identity.
///
/// # Example
///
/// ```rust
/// use batchaug_core::{RandomSource, ScriptedSource};
///
/// let mut source = ScriptedSource::new().with_floats([0.9]).with_ints([3]);
/// assert_eq!(source.uniform_float(), 0.9);
/// assert_eq!(source.uniform_int(-4, 4), 3);
/// assert_eq!(source.uniform_int(-4, 4), 0);
/// ```
#[derive(Debug, Clone, Default)]
pub struct ScriptedSource {
    floats: VecDeque<f32>,
    ints: VecDeque<i64>,
    betas: VecDeque<f32>,
    permutations: VecDeque<Vec<usize>>,
}

impl ScriptedSource {
    /// Create an empty script.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue uniform float draws.
    #[must_use]
    pub fn with_floats(mut self, values: impl IntoIterator<Item = f32>) -> Self {
        self.floats.extend(values);
        self
    }

    /// Queue integer draws.
    #[must_use]
    pub fn with_ints(mut self, values: impl IntoIterator<Item = i64>) -> Self {
        self.ints.extend(values);
        self
    }

    /// Queue Beta draws.
    #[must_use]
    pub fn with_betas(mut self, values: impl IntoIterator<Item = f32>) -> Self {
        self.betas.extend(values);
        self
    }

    /// Queue permutations.
    #[must_use]
    pub fn with_permutations(mut self, values: impl IntoIterator<Item = Vec<usize>>) -> Self {
        self.permutations.extend(values);
        self
    }

    /// Number of scripted draws not yet consumed.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.floats.len() + self.ints.len() + self.betas.len() + self.permutations.len()
    }
}

impl RandomSource for ScriptedSource {
    fn uniform_float(&mut self) -> f32 {
        self.floats.pop_front().unwrap_or(0.0)
    }

    fn uniform_int(&mut self, low: i64, high: i64) -> i64 {
        let high = high.max(low);
        self.ints.pop_front().unwrap_or(0).clamp(low, high)
    }

    fn beta(&mut self, alpha: f32, beta: f32) -> Result<f32> {
        check_beta_params(alpha, beta)?;
        Ok(self.betas.pop_front().unwrap_or(0.5).clamp(0.0, 1.0))
    }

    fn permutation(&mut self, n: usize) -> Vec<usize> {
        match self.permutations.pop_front() {
            Some(perm) if perm.len() == n => perm,
            _ => (0..n).collect(),
        }
    }
}
