//! Score bookkeeping

use serde::{Deserialize, Serialize};

/// Session score accumulator
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreTracker {
    total: u64,
}

impl ScoreTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> u64 {
        self.total
    }

    /// Add points, returning the new total
    pub fn add(&mut self, amount: u64) -> u64 {
        self.total = self.total.saturating_add(amount);
        self.total
    }
}
