//! # xlsxtab
//!
//! Decode a worksheet of an XLSX workbook into a plain row/column table and
//! export it as a console preview, CSV, delimiter-joined text or JSON.
//!
//! Cell values are kept as the strings stored in the sheet: shared strings
//! are resolved, everything else (numbers, booleans, dates, cached formula
//! results) is passed through verbatim.
//!
//! ## Quick Start
//!
//! ```no_run
//! use xlsxtab::{read_sheet, summarize};
//!
//! let table = read_sheet("data.xlsx", "1")?;
//! let stats = summarize(&table);
//! println!("{} rows, {} cells", stats.row_count, stats.cell_count);
//!
//! let csv = xlsxtab::render::render_csv(&table);
//! std::fs::write("data.csv", csv)?;
//! # Ok::<(), xlsxtab::Error>(())
//! ```
//!
//! ## Sheet identifiers
//!
//! An identifier `id` selects, in order: the part `xl/worksheets/<id>.xml`,
//! the part `xl/worksheets/sheet<id>.xml`, then the sheet named `id` in the
//! workbook. An empty identifier selects the first sheet.

pub mod container;
pub mod error;
pub mod model;
pub mod render;
pub mod xlsx;

#[cfg(test)]
mod test_util;

// Re-exports
pub use container::{CoreProperties, Package};
pub use error::{Error, Result};
pub use model::{summarize, Row, Stats, Table};
pub use xlsx::{SharedStrings, XlsxReader};

use std::path::Path;

/// Decode one sheet of an XLSX file.
///
/// The archive is opened, decoded and released before returning.
///
/// # Example
///
/// ```no_run
/// let table = xlsxtab::read_sheet("data.xlsx", "Sheet1")?;
/// println!("Rows: {}", table.len());
/// # Ok::<(), xlsxtab::Error>(())
/// ```
pub fn read_sheet(path: impl AsRef<Path>, sheet: &str) -> Result<Table> {
    let package = Package::open(path)?;
    let shared_strings = SharedStrings::load(&package)?;
    xlsx::decode(&package, sheet, &shared_strings)
}

/// Decode one sheet of an in-memory XLSX file.
pub fn read_sheet_from_bytes(data: Vec<u8>, sheet: &str) -> Result<Table> {
    let package = Package::from_bytes(data)?;
    let shared_strings = SharedStrings::load(&package)?;
    xlsx::decode(&package, sheet, &shared_strings)
}

/// Decode one sheet of an XLSX file and render it as CSV.
pub fn to_csv(path: impl AsRef<Path>, sheet: &str) -> Result<Vec<u8>> {
    let table = read_sheet(path, sheet)?;
    Ok(render::render_csv(&table))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_util::{build_package_bytes, worksheet};

    #[test]
    fn test_read_sheet_from_bytes() {
        let data = build_package_bytes(&[(
            "xl/worksheets/sheet1.xml",
            worksheet(r#"<row><c><v>1</v></c><c><v>2</v></c></row>"#).as_str(),
        )]);
        let table = read_sheet_from_bytes(data, "1").unwrap();
        assert_eq!(table.to_vecs(), vec![vec!["1", "2"]]);
    }

    #[test]
    fn test_to_csv() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("book.xlsx");
        let data = build_package_bytes(&[(
            "xl/worksheets/sheet1.xml",
            worksheet(r#"<row><c t="inlineStr"><is><t>a,b</t></is></c><c><v>2</v></c></row>"#)
                .as_str(),
        )]);
        std::fs::write(&path, data).unwrap();

        let csv = to_csv(&path, "1").unwrap();
        assert_eq!(csv, b"\"a,b\",2\n");
    }

    #[test]
    fn test_read_sheet_missing_file() {
        let err = read_sheet("no/such/book.xlsx", "1").unwrap_err();
        assert!(matches!(err, Error::InputNotFound(_)));
    }
}
