//! Output rendering for decoded tables.
//!
//! This module renders a [`Table`](crate::Table) as a console preview, CSV,
//! delimiter-joined text or JSON, and writes file exports.
//!
//! # Example
//!
//! ```no_run
//! use xlsxtab::render::*;
//!
//! let table = xlsxtab::read_sheet("data.xlsx", "1")?;
//!
//! // Preview the first rows
//! print!("{}", render_console(&table, &PreviewOptions::default()));
//!
//! // Export to CSV next to the input
//! let target = ExportTarget::file(ExportFormat::Csv, std::path::Path::new("data.xlsx"), None);
//! if let ExportOutcome::Written { path, bytes } = export(&table, &target)? {
//!     println!("{} ({} bytes)", path.display(), bytes);
//! }
//! # Ok::<(), xlsxtab::Error>(())
//! ```

mod console;
mod csv;
mod delimited;
mod export;
mod json;
mod options;

pub use console::render_console;
pub use csv::{render_csv, write_csv};
pub use delimited::{render_delimited, write_delimited};
pub use export::{export, write_file, ExportOutcome};
pub use json::{to_json, JsonFormat};
pub use options::{default_destination, ExportFormat, ExportTarget, PreviewOptions};
