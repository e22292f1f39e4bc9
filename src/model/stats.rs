//! Table statistics.

use super::Table;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Counts derived from a decoded table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stats {
    /// Number of rows kept in the table
    pub row_count: usize,
    /// Length of the longest row, 0 for an empty table
    pub max_columns: usize,
    /// Sum of all row lengths
    pub cell_count: usize,
    /// Decode time measured by the caller
    #[serde(skip)]
    pub elapsed: Option<Duration>,
}

impl Stats {
    /// Attach the time it took to decode the table.
    pub fn with_elapsed(mut self, elapsed: Duration) -> Self {
        self.elapsed = Some(elapsed);
        self
    }
}

/// Summarize a table.
pub fn summarize(table: &Table) -> Stats {
    let (max_columns, cell_count) = table
        .rows()
        .iter()
        .fold((0usize, 0usize), |(max, total), row| (max.max(row.len()), total + row.len()));

    Stats {
        row_count: table.len(),
        max_columns,
        cell_count,
        elapsed: None,
    }
}
