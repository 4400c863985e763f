//! Match-length histogram.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// How often each partial match length was seen. Append-only.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchLengthHistogram {
    counts: BTreeMap<usize, u64>,
}

impl MatchLengthHistogram {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, length: usize) {
        *self.counts.entry(length).or_insert(0) += 1;
    }

    pub fn count(&self, length: usize) -> u64 {
        self.counts.get(&length).copied().unwrap_or(0)
    }

    /// Total number of resolved candidates.
    pub fn total(&self) -> u64 {
        self.counts.values().sum()
    }

    pub fn longest(&self) -> Option<usize> {
        self.counts.keys().next_back().copied()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// `(length, count)` pairs in ascending length order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, u64)> + '_ {
        self.counts.iter().map(|(&length, &count)| (length, count))
    }
}

impl fmt::Display for MatchLengthHistogram {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "  {:>6} | {:>12}", "Length", "Count")?;
        writeln!(f, "  {}", "-".repeat(21))?;
        for (length, count) in self.iter() {
            writeln!(f, "  {:>6} | {:>12}", length, count)?;
        }
        Ok(())
    }
}
