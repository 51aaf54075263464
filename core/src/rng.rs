//! Deterministic random number generation.
//!
//! RULE: Nothing in the scheduler may call a platform RNG directly.
//! All randomness flows through a SchedulerRng handed to the scheduler
//! at construction. Tests pass a fixed seed; production wiring seeds
//! from OS entropy.

use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_pcg::Pcg64Mcg;

/// Seedable PRNG used for queue tie-breaking.
#[derive(Debug, Clone)]
pub struct SchedulerRng {
    inner: Pcg64Mcg,
}

impl SchedulerRng {
    pub fn new(seed: u64) -> Self {
        Self { inner: Pcg64Mcg::seed_from_u64(seed) }
    }

    /// Seed from OS entropy. Not reproducible.
    pub fn from_entropy() -> Self {
        Self { inner: Pcg64Mcg::from_entropy() }
    }

    /// Uniform in-place shuffle (Fisher-Yates).
    pub fn shuffle<T>(&mut self, items: &mut [T]) {
        items.shuffle(&mut self.inner);
    }
}
