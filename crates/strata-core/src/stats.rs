use serde::{Deserialize, Serialize};
use std::fmt;

/// Shape of a skip list at a point in time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stats {
    pub len: usize,
    pub num_levels: usize,
    pub max_level: usize,
    /// `level_counts[i]` is the number of nodes that reach level `i + 1`.
    pub level_counts: Vec<usize>,
}

impl Stats {
    /// Forward pointers held by real nodes.
    pub fn total_pointers(&self) -> usize {
        self.level_counts.iter().sum()
    }

    pub fn average_level(&self) -> f64 {
        if self.len == 0 {
            return 0.0;
        }
        self.total_pointers() as f64 / self.len as f64
    }
}

impl fmt::Display for Stats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Entries: {}", self.len)?;
        writeln!(f, "Levels in use: {} (max {})", self.num_levels, self.max_level)?;
        writeln!(f, "Average level: {:.2}", self.average_level())?;

        for (i, count) in self.level_counts.iter().enumerate() {
            if *count == 0 {
                break;
            }
            let percentage = (*count as f64 / self.len as f64) * 100.0;
            let bar = "#".repeat((percentage / 2.0) as usize);
            writeln!(
                f,
                "  Level {:2}: {:7} nodes ({:6.2}%) {}",
                i + 1,
                count,
                percentage,
                bar
            )?;
        }

        Ok(())
    }
}
