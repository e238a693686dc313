//! Seeded random source shared by the breeding loop.

use rand::prelude::*;

/// Random number generator wrapper for selection and variation.
///
/// A single instance drives every random decision of a run, so two runs
/// with the same seed make the same decisions in the same order.
#[derive(Debug, Clone)]
pub struct SearchRng {
    rng: StdRng,
}

impl SearchRng {
    /// Create from seed.
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Uniform sample in `[0, 1)`.
    pub fn next_f64(&mut self) -> f64 {
        self.rng.r#gen::<f64>()
    }

    /// Uniform index in `0..len`. `len` must be non-zero.
    pub fn index(&mut self, len: usize) -> usize {
        self.rng.gen_range(0..len)
    }

    /// Bernoulli trial with probability `p`.
    pub fn chance(&mut self, p: f64) -> bool {
        self.next_f64() < p
    }

    /// Uniform random in inclusive bounds.
    pub fn uniform(&mut self, bounds: (f64, f64)) -> f64 {
        self.rng.gen_range(bounds.0..=bounds.1)
    }

    /// Gaussian mutation: add noise scaled to the bounds width, then clamp.
    pub fn gaussian_mutate(&mut self, value: f64, strength: f64, bounds: (f64, f64)) -> f64 {
        let noise: f64 = self.rng.sample(rand_distr::StandardNormal);
        let mutated = value + noise * strength * (bounds.1 - bounds.0);
        mutated.clamp(bounds.0, bounds.1)
    }
}
