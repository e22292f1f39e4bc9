//! JSON renderer implementation.

use crate::error::Result;
use crate::model::{Stats, Table};
use serde::Serialize;

/// JSON output format options.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum JsonFormat {
    /// Compact single-line JSON
    Compact,
    /// Pretty-printed with 2-space indentation
    #[default]
    Pretty,
}

#[derive(Serialize)]
struct JsonExport<'a> {
    stats: &'a Stats,
    rows: &'a Table,
}

/// Convert a table and its statistics to JSON.
pub fn to_json(table: &Table, stats: &Stats, format: JsonFormat) -> Result<String> {
    let export = JsonExport { stats, rows: table };
    let json = match format {
        JsonFormat::Compact => serde_json::to_string(&export)?,
        JsonFormat::Pretty => serde_json::to_string_pretty(&export)?,
    };
    Ok(json)
}
