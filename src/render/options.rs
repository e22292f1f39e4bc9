//! Export configuration.

use std::path::{Path, PathBuf};

/// Limits for the console preview.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreviewOptions {
    /// Maximum rows shown
    pub max_rows: usize,

    /// Maximum cells shown per row
    pub max_cols: usize,

    /// Text placed between cells
    pub separator: String,

    /// Clip cells wider than this many terminal columns (None = no clipping)
    pub max_cell_width: Option<usize>,
}

impl Default for PreviewOptions {
    fn default() -> Self {
        Self {
            max_rows: 10,
            max_cols: 10,
            separator: " | ".to_string(),
            max_cell_width: None,
        }
    }
}

impl PreviewOptions {
    /// Create new preview options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the maximum number of rows shown.
    pub fn with_max_rows(mut self, rows: usize) -> Self {
        self.max_rows = rows;
        self
    }

    /// Set the maximum number of cells shown per row.
    pub fn with_max_cols(mut self, cols: usize) -> Self {
        self.max_cols = cols;
        self
    }

    /// Set the cell separator.
    pub fn with_separator(mut self, separator: impl Into<String>) -> Self {
        self.separator = separator.into();
        self
    }

    /// Clip long cells to a display width. Widths below 2 are raised to 2.
    pub fn with_max_cell_width(mut self, width: Option<usize>) -> Self {
        self.max_cell_width = width.map(|w| w.max(2));
        self
    }
}

/// File export formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    /// Comma-separated values with quoting
    Csv,
    /// Cells joined by a delimiter, without any escaping
    Delimited(char),
    /// Rows and statistics as JSON
    Json,
}

impl ExportFormat {
    /// Tab-separated text.
    pub const TAB: ExportFormat = ExportFormat::Delimited('\t');

    /// File extension used for default destinations.
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Delimited(_) => "txt",
            ExportFormat::Json => "json",
        }
    }
}

/// Where a decoded table goes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExportTarget {
    /// Text preview returned to the caller
    Console(PreviewOptions),
    /// File written in the given format
    File {
        format: ExportFormat,
        destination: PathBuf,
    },
}

impl ExportTarget {
    /// File target, defaulting the destination to the input path with the
    /// format's extension.
    pub fn file(format: ExportFormat, input: &Path, destination: Option<PathBuf>) -> Self {
        ExportTarget::File {
            format,
            destination: destination.unwrap_or_else(|| default_destination(input, format)),
        }
    }
}

/// Input path with the export format's extension substituted.
pub fn default_destination(input: &Path, format: ExportFormat) -> PathBuf {
    input.with_extension(format.extension())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_preview() {
        let opts = PreviewOptions::default();
        assert_eq!(opts.max_rows, 10);
        assert_eq!(opts.max_cols, 10);
        assert_eq!(opts.separator, " | ");
        assert!(opts.max_cell_width.is_none());
    }

    #[test]
    fn test_builder_pattern() {
        let opts = PreviewOptions::new()
            .with_max_rows(3)
            .with_max_cols(4)
            .with_separator(", ")
            .with_max_cell_width(Some(1));
        assert_eq!(opts.max_rows, 3);
        assert_eq!(opts.max_cols, 4);
        assert_eq!(opts.separator, ", ");
        assert_eq!(opts.max_cell_width, Some(2));
    }

    #[test]
    fn test_default_destination() {
        let input = Path::new("data/report.xlsx");
        assert_eq!(
            default_destination(input, ExportFormat::Csv),
            PathBuf::from("data/report.csv")
        );
        assert_eq!(
            default_destination(input, ExportFormat::TAB),
            PathBuf::from("data/report.txt")
        );
        assert_eq!(
            default_destination(input, ExportFormat::Json),
            PathBuf::from("data/report.json")
        );
    }

    #[test]
    fn test_file_target() {
        let input = Path::new("book.xlsx");
        let target = ExportTarget::file(ExportFormat::Csv, input, None);
        assert_eq!(
            target,
            ExportTarget::File {
                format: ExportFormat::Csv,
                destination: PathBuf::from("book.csv"),
            }
        );

        let target = ExportTarget::file(ExportFormat::TAB, input, Some("out.tsv".into()));
        assert!(matches!(target, ExportTarget::File { ref destination, .. } if destination == Path::new("out.tsv")));
    }
}
