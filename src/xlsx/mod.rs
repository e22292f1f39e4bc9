//! XLSX (Excel) worksheet decoding.
//!
//! # Example
//!
//! ```no_run
//! use xlsxtab::xlsx::XlsxReader;
//!
//! let reader = XlsxReader::open("spreadsheet.xlsx")?;
//! let table = reader.read_sheet("1")?;
//!
//! for row in table.rows() {
//!     println!("{}", row.cells().join(" | "));
//! }
//! # Ok::<(), xlsxtab::Error>(())
//! ```

mod reader;
mod shared_strings;
mod workbook;
mod worksheet;

pub use reader::XlsxReader;
pub use shared_strings::SharedStrings;
pub use workbook::{SheetEntry, WorkbookIndex};
pub use worksheet::{
    column_index, decode, decode_part, decode_worksheet, resolve_sheet_part, sheet_candidates,
    CellType, RawCell, DEFAULT_SHEET_PART, WORKSHEETS_DIR,
};
