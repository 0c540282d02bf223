//! Deterministic random number generation for shared course layouts.
//!
//! Both clients must derive identical obstacle courses without transmitting
//! them, so everything here is seed-driven: the same seed always produces
//! the same sequence. Context streams separate randomness domains (e.g.
//! obstacle spacing vs obstacle height) without the streams interfering.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::hash::{Hash, Hasher};

/// Deterministic RNG with named context streams.
///
/// Uses ChaCha8 for speed while keeping high-quality output.
#[derive(Clone, Debug)]
pub struct CourseRng {
    inner: ChaCha8Rng,
    seed: u64,
}

impl CourseRng {
    /// Create a new RNG with the given seed.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            inner: ChaCha8Rng::seed_from_u64(seed),
            seed,
        }
    }

    /// Create an independent stream for a specific context.
    ///
    /// The same context always produces the same stream from the same seed.
    #[must_use]
    pub fn for_context(&self, context: &str) -> Self {
        use std::collections::hash_map::DefaultHasher;

        let mut hasher = DefaultHasher::new();
        self.seed.hash(&mut hasher);
        context.hash(&mut hasher);
        Self::new(hasher.finish())
    }

    /// Generate a random f32 in the given range.
    pub fn gen_range_f32(&mut self, range: std::ops::Range<f32>) -> f32 {
        self.inner.gen_range(range)
    }

    /// Generate a random u32 in the given range.
    pub fn gen_range(&mut self, range: std::ops::Range<u32>) -> u32 {
        self.inner.gen_range(range)
    }
}
