use rand::rngs::StdRng;
use rand::SeedableRng;
use rand_distr::{Distribution, Normal};

/// Source of Gaussian perturbations, injectable so tests can substitute a
/// deterministic generator.
pub trait NoiseSource {
    fn sample(&mut self, mean: f64, stddev: f64) -> f64;
}

/// Production noise source backed by a seedable RNG.
pub struct GaussianNoise {
    rng: StdRng,
}

impl GaussianNoise {
    /// Entropy-seeded source; perturbations differ run to run.
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    /// Deterministic source for reproducible datasets.
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Default for GaussianNoise {
    fn default() -> Self {
        Self::new()
    }
}

impl NoiseSource for GaussianNoise {
    fn sample(&mut self, mean: f64, stddev: f64) -> f64 {
        if stddev <= 0.0 {
            return mean;
        }
        match Normal::new(mean, stddev) {
            Ok(normal) => normal.sample(&mut self.rng),
            Err(_) => mean,
        }
    }
}
