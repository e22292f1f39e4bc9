//! Decoded worksheet model.

mod stats;
mod table;

pub use stats::{summarize, Stats};
pub use table::{Row, Table};
