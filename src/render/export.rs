//! Writing rendered tables to their destination.

use crate::error::{Error, Result};
use crate::model::{summarize, Table};
use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use super::console::render_console;
use super::csv::write_csv;
use super::delimited::write_delimited;
use super::json::{to_json, JsonFormat};
use super::options::{ExportFormat, ExportTarget};

/// Result of an export.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExportOutcome {
    /// Console preview text
    Preview(String),
    /// File written, with its size in bytes
    Written { path: PathBuf, bytes: u64 },
}

/// Send a table to an export target.
pub fn export(table: &Table, target: &ExportTarget) -> Result<ExportOutcome> {
    match target {
        ExportTarget::Console(options) => Ok(ExportOutcome::Preview(render_console(table, options))),
        ExportTarget::File {
            format,
            destination,
        } => {
            let bytes = write_file(table, *format, destination)?;
            log::debug!("wrote {bytes} bytes to {}", destination.display());
            Ok(ExportOutcome::Written {
                path: destination.clone(),
                bytes,
            })
        }
    }
}

/// Write a table to `path` in the given format, returning the file size.
///
/// The file is flushed and closed before returning. If writing fails the
/// partial file is removed.
pub fn write_file(table: &Table, format: ExportFormat, path: &Path) -> Result<u64> {
    let failed = |source: io::Error| Error::OutputWriteFailed {
        path: path.to_path_buf(),
        source,
    };

    let file = File::create(path).map_err(failed)?;
    let mut writer = BufWriter::new(file);

    let result = write_format(table, format, &mut writer).and_then(|bytes| {
        writer.flush()?;
        Ok(bytes)
    });
    drop(writer);

    result.map_err(|e| {
        if let Err(remove_err) = fs::remove_file(path) {
            log::warn!("could not remove partial output {}: {remove_err}", path.display());
        }
        failed(e)
    })
}

fn write_format<W: Write>(table: &Table, format: ExportFormat, writer: &mut W) -> io::Result<u64> {
    match format {
        ExportFormat::Csv => write_csv(table, writer),
        ExportFormat::Delimited(delimiter) => write_delimited(table, delimiter, writer),
        ExportFormat::Json => {
            let json = to_json(table, &summarize(table), JsonFormat::Pretty)
                .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e.to_string()))?;
            writer.write_all(json.as_bytes())?;
            writer.write_all(b"\n")?;
            Ok(json.len() as u64 + 1)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Row;
    use crate::render::PreviewOptions;

    fn sample() -> Table {
        vec![Row::from_iter(["a,b", "c"]), Row::from_iter(["d"])]
            .into_iter()
            .collect()
    }

    #[test]
    fn test_console_export() {
        let outcome = export(&sample(), &ExportTarget::Console(PreviewOptions::default())).unwrap();
        assert_eq!(
            outcome,
            ExportOutcome::Preview("Row 1: a,b | c\nRow 2: d\n".to_string())
        );
    }

    #[test]
    fn test_csv_file_export() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.csv");
        let target = ExportTarget::File {
            format: ExportFormat::Csv,
            destination: path.clone(),
        };

        let outcome = export(&sample(), &target).unwrap();
        let content = fs::read_to_string(&path).unwrap();
        assert_eq!(content, "\"a,b\",c\nd\n");
        assert_eq!(
            outcome,
            ExportOutcome::Written {
                path: path.clone(),
                bytes: content.len() as u64,
            }
        );
        assert_eq!(fs::metadata(&path).unwrap().len(), content.len() as u64);
    }

    #[test]
    fn test_tab_file_export() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.txt");
        let bytes = write_file(&sample(), ExportFormat::TAB, &path).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "a,b\tc\nd\n");
        assert_eq!(bytes, 8);
    }

    #[test]
    fn test_json_file_export() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.json");
        let bytes = write_file(&sample(), ExportFormat::Json, &path).unwrap();
        assert_eq!(fs::metadata(&path).unwrap().len(), bytes);

        let value: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(value["stats"]["cell_count"], 3);
    }

    #[test]
    fn test_unwritable_destination() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing-dir").join("out.csv");
        let err = write_file(&sample(), ExportFormat::Csv, &path).unwrap_err();
        assert!(matches!(err, Error::OutputWriteFailed { .. }));
        assert_eq!(err.stage(), "export");
        assert!(!path.exists());
    }
}
