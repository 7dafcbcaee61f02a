//! Injectable randomness for spawn geometry, wait times and fade rates

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

/// Source of uniform randomness.
///
/// Everything random in the engine flows through this trait so tests can pin
/// the sequence.
pub trait RandomSource {
    /// Uniform sample in `[0, 1)`
    fn next_unit(&mut self) -> f64;

    /// Uniform sample in `[min, max)`; returns `min` when the range is empty
    fn range(&mut self, min: f64, max: f64) -> f64 {
        if max <= min {
            return min;
        }
        min + self.next_unit() * (max - min)
    }

    /// Uniform integer in `[min, max]`
    fn range_inclusive(&mut self, min: u32, max: u32) -> u32 {
        if max <= min {
            return min;
        }
        let span = (max - min + 1) as f64;
        let offset = (self.next_unit() * span).floor() as u32;
        min + offset.min(max - min)
    }

    /// True with the given probability
    fn chance(&mut self, probability: f64) -> bool {
        self.next_unit() < probability
    }
}

/// Production random source backed by `SmallRng`
pub struct SeededRandom {
    rng: SmallRng,
}

impl SeededRandom {
    /// Deterministic sequence for tests and reproducible previews
    pub fn from_seed(seed: u64) -> Self {
        Self {
            rng: SmallRng::seed_from_u64(seed),
        }
    }

    /// Seeded from platform entropy (`crypto.getRandomValues()` in the browser)
    pub fn from_entropy() -> Self {
        Self {
            rng: SmallRng::from_entropy(),
        }
    }
}

impl RandomSource for SeededRandom {
    fn next_unit(&mut self) -> f64 {
        self.rng.gen::<f64>()
    }
}
