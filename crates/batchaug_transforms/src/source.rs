//! Random source shared by a transform across calls.

use parking_lot::{Mutex, MutexGuard};

use batchaug_core::{RandomSource, Seed, SeededSource};

/// A [`SeededSource`] behind a lock, so `Send + Sync` transforms can keep
/// advancing one stream across `apply` calls.
pub(crate) struct SharedSource {
    inner: Mutex<SeededSource>,
}

impl SharedSource {
    pub(crate) fn new(seed: Seed) -> Self {
        Self {
            inner: Mutex::new(SeededSource::new(seed)),
        }
    }

    pub(crate) fn lock(&self) -> MutexGuard<'_, SeededSource> {
        self.inner.lock()
    }
}

/// Probability gate. A draw is only consumed when `p < 1`.
pub(crate) fn passes<R: RandomSource + ?Sized>(p: f32, rng: &mut R) -> bool {
    if p >= 1.0 {
        return true;
    }
    rng.uniform_float() < p
}
