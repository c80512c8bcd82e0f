pub mod error;
pub mod config;

pub mod level;
mod node;
pub mod skiplist;
pub mod stats;

pub use error::{Error, Result};
pub use config::{Config, MAX_LEVEL, PROBABILITY};
pub use level::{GeometricLevelGenerator, LevelGenerator};
pub use skiplist::{Iter, Range, SkipList};
pub use stats::Stats;
