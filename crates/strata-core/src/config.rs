use crate::{Error, Result};
use serde::{Deserialize, Serialize};

/// Hard ceiling on node height; sized for lists up to roughly `0.25^-16` entries.
pub const MAX_LEVEL: usize = 16;

/// Chance that a node at level `i` also reaches level `i + 1`.
pub const PROBABILITY: f64 = 0.25;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub max_level: usize,
    pub probability: f64,
    pub seed: Option<u64>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            max_level: MAX_LEVEL,
            probability: PROBABILITY,
            seed: None,
        }
    }
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_max_level(mut self, max_level: usize) -> Self {
        self.max_level = max_level;
        self
    }

    pub fn with_probability(mut self, probability: f64) -> Self {
        self.probability = probability;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.max_level == 0 {
            return Err(Error::InvalidConfig(
                "max_level must be at least 1".to_string(),
            ));
        }

        if self.max_level > MAX_LEVEL {
            return Err(Error::InvalidConfig(format!(
                "max_level must be at most {}",
                MAX_LEVEL
            )));
        }

        // NaN fails both comparisons, so test for the valid range instead.
        if !(self.probability > 0.0 && self.probability < 1.0) {
            return Err(Error::InvalidConfig(
                "probability must be in (0, 1)".to_string(),
            ));
        }

        Ok(())
    }
}
