//! Error types for the xlsxtab library.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for xlsxtab operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while decoding or exporting a worksheet.
#[derive(Error, Debug)]
pub enum Error {
    /// The input path does not exist.
    #[error("Input not found: {}", .0.display())]
    InputNotFound(PathBuf),

    /// The input is not a readable ZIP/OOXML container.
    #[error("Not an XLSX archive: {0}")]
    NotAnArchive(String),

    /// A part required by the caller is absent from the package.
    #[error("Missing part: {0}")]
    MissingPart(String),

    /// No worksheet part matched the requested identifier.
    #[error("Sheet '{requested}' not found (available: {})", join_or_none(.available))]
    SheetNotFound {
        /// Identifier as given by the caller
        requested: String,
        /// Every worksheet part present in the package
        available: Vec<String>,
    },

    /// A required XML part could not be parsed.
    #[error("Malformed markup in {part}: {message}")]
    MalformedMarkup {
        /// Part name, or "<xml>" when parsing a detached string
        part: String,
        /// Parser message
        message: String,
    },

    /// A shared-string index does not resolve to an entry.
    #[error("Shared string index {index} out of range (table has {len} entries)")]
    IndexOutOfRange {
        /// Index read from the cell
        index: usize,
        /// Number of entries in the table
        len: usize,
    },

    /// The export destination could not be written.
    #[error("Failed to write {}: {source}", .path.display())]
    OutputWriteFailed {
        /// Export destination
        path: PathBuf,
        /// Underlying I/O failure
        #[source]
        source: io::Error,
    },

    /// Error while serializing an export.
    #[error("Serialization error: {0}")]
    Serialize(String),

    /// I/O error during file operations.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

fn join_or_none(parts: &[String]) -> String {
    if parts.is_empty() {
        "none".to_string()
    } else {
        parts.join(", ")
    }
}

impl Error {
    /// Create a markup error tagged with the part it came from.
    pub fn malformed(part: impl Into<String>, message: impl ToString) -> Self {
        Error::MalformedMarkup {
            part: part.into(),
            message: message.to_string(),
        }
    }

    /// Re-tag a markup error with the part it came from.
    ///
    /// Other variants pass through unchanged.
    pub fn in_part(self, part: &str) -> Self {
        match self {
            Error::MalformedMarkup { message, .. } => Error::malformed(part, message),
            other => other,
        }
    }

    /// Name of the pipeline stage this error belongs to.
    pub fn stage(&self) -> &'static str {
        match self {
            Error::InputNotFound(_) | Error::NotAnArchive(_) | Error::Io(_) => "open",
            Error::MissingPart(_)
            | Error::SheetNotFound { .. }
            | Error::MalformedMarkup { .. }
            | Error::IndexOutOfRange { .. } => "decode",
            Error::OutputWriteFailed { .. } | Error::Serialize(_) => "export",
        }
    }
}

impl From<zip::result::ZipError> for Error {
    fn from(err: zip::result::ZipError) -> Self {
        match err {
            zip::result::ZipError::Io(e) => Error::Io(e),
            other => Error::NotAnArchive(other.to_string()),
        }
    }
}

impl From<quick_xml::Error> for Error {
    fn from(err: quick_xml::Error) -> Self {
        Error::malformed("<xml>", err)
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Serialize(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::SheetNotFound {
            requested: "sheet2".to_string(),
            available: vec![
                "xl/worksheets/sheet1.xml".to_string(),
                "xl/worksheets/sheet3.xml".to_string(),
            ],
        };
        assert_eq!(
            err.to_string(),
            "Sheet 'sheet2' not found (available: xl/worksheets/sheet1.xml, xl/worksheets/sheet3.xml)"
        );

        let err = Error::SheetNotFound {
            requested: "x".to_string(),
            available: Vec::new(),
        };
        assert_eq!(err.to_string(), "Sheet 'x' not found (available: none)");
    }

    #[test]
    fn test_error_from_io() {
        let io_err = io::Error::new(io::ErrorKind::PermissionDenied, "denied");
        let err: Error = io_err.into();
        assert!(matches!(err, Error::Io(_)));
        assert_eq!(err.stage(), "open");
    }

    #[test]
    fn test_in_part_retags_markup_only() {
        let err = Error::malformed("<xml>", "bad tag").in_part("xl/worksheets/sheet1.xml");
        assert_eq!(
            err.to_string(),
            "Malformed markup in xl/worksheets/sheet1.xml: bad tag"
        );

        let err = Error::MissingPart("a.xml".to_string()).in_part("b.xml");
        assert!(matches!(err, Error::MissingPart(ref p) if p == "a.xml"));
    }

    #[test]
    fn test_stages() {
        assert_eq!(Error::NotAnArchive("x".into()).stage(), "open");
        assert_eq!(Error::malformed("p", "m").stage(), "decode");
        assert_eq!(Error::Serialize("x".into()).stage(), "export");
    }
}
