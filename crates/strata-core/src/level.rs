use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Decides how many levels a freshly inserted node participates in.
///
/// `random_level` must return a value in `[1, max_level()]`.
pub trait LevelGenerator {
    fn random_level(&mut self) -> usize;
    fn max_level(&self) -> usize;
}

/// Geometric level distribution: a node at level `n` reaches level `n + 1`
/// with probability `p`.
#[derive(Debug, Clone)]
pub struct GeometricLevelGenerator<R = StdRng> {
    max_level: usize,
    p: f64,
    rng: R,
}

impl<R: Rng> GeometricLevelGenerator<R> {
    /// # Panics
    ///
    /// If `max_level` is zero or `p` is outside `(0, 1)`. Use
    /// [`Config::validate`](crate::Config::validate) to check these first.
    pub fn new(max_level: usize, p: f64, rng: R) -> Self {
        assert!(max_level > 0, "max_level must be non-zero");
        assert!(p > 0.0 && p < 1.0, "p must be in (0, 1)");
        GeometricLevelGenerator { max_level, p, rng }
    }

    pub fn probability(&self) -> f64 {
        self.p
    }
}

impl GeometricLevelGenerator<StdRng> {
    pub fn seeded(max_level: usize, p: f64, seed: u64) -> Self {
        Self::new(max_level, p, StdRng::seed_from_u64(seed))
    }

    pub fn from_entropy(max_level: usize, p: f64) -> Self {
        Self::new(max_level, p, StdRng::from_entropy())
    }
}

impl<R: Rng> LevelGenerator for GeometricLevelGenerator<R> {
    fn random_level(&mut self) -> usize {
        let mut level = 1;
        while level < self.max_level && self.rng.gen::<f64>() < self.p {
            level += 1;
        }
        level
    }

    fn max_level(&self) -> usize {
        self.max_level
    }
}
