//! Workbook reading session.

use crate::container::{CoreProperties, Package};
use crate::error::Result;
use crate::model::Table;
use std::path::Path;

use super::shared_strings::SharedStrings;
use super::workbook::{SheetEntry, WorkbookIndex};
use super::worksheet::{self, WORKSHEETS_DIR};

/// Reader for XLSX (Excel) workbooks.
///
/// Holds the opened package and the shared strings for the duration of one
/// decode. Dropping the reader releases the archive.
pub struct XlsxReader {
    package: Package,
    shared_strings: SharedStrings,
    workbook: WorkbookIndex,
    fallback: bool,
}

impl XlsxReader {
    /// Open an XLSX file for reading.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        Self::from_package(Package::open(path)?)
    }

    /// Create a reader from bytes.
    pub fn from_bytes(data: Vec<u8>) -> Result<Self> {
        Self::from_package(Package::from_bytes(data)?)
    }

    /// Create a reader over an already opened package.
    pub fn from_package(package: Package) -> Result<Self> {
        let shared_strings = SharedStrings::load(&package)?;
        let workbook = WorkbookIndex::load_or_empty(&package);

        Ok(Self {
            package,
            shared_strings,
            workbook,
            fallback: false,
        })
    }

    /// Fall back to `sheet1.xml` when an identifier matches no sheet.
    ///
    /// Off by default: an unknown identifier is reported as
    /// [`Error::SheetNotFound`](crate::Error::SheetNotFound).
    pub fn with_default_fallback(mut self, enabled: bool) -> Self {
        self.fallback = enabled;
        self
    }

    /// Resolve a sheet identifier to its worksheet part.
    pub fn resolve_sheet(&self, sheet: &str) -> Result<String> {
        worksheet::resolve_sheet_part(&self.package, &self.workbook, sheet, self.fallback)
    }

    /// Decode the sheet selected by `sheet`.
    pub fn read_sheet(&self, sheet: &str) -> Result<Table> {
        let part = self.resolve_sheet(sheet)?;
        self.read_part(&part)
    }

    /// Decode a worksheet part by its name.
    pub fn read_part(&self, part: &str) -> Result<Table> {
        worksheet::decode_part(&self.package, part, &self.shared_strings)
    }

    /// Get a reference to the package.
    pub fn package(&self) -> &Package {
        &self.package
    }

    /// Get the shared strings table.
    pub fn shared_strings(&self) -> &SharedStrings {
        &self.shared_strings
    }

    /// Sheets declared in the workbook, in tab order.
    pub fn sheets(&self) -> &[SheetEntry] {
        self.workbook.sheets()
    }

    /// Get sheet display names.
    pub fn sheet_names(&self) -> Vec<&str> {
        self.workbook.sheets().iter().map(|s| s.name.as_str()).collect()
    }

    /// Worksheet parts present in the package.
    pub fn sheet_parts(&self) -> Vec<&str> {
        self.package.list_parts(WORKSHEETS_DIR, ".xml").collect()
    }

    /// Document properties from `docProps/core.xml`.
    pub fn metadata(&self) -> CoreProperties {
        self.package.core_properties()
    }
}

impl std::fmt::Debug for XlsxReader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("XlsxReader")
            .field("package", &self.package)
            .field("shared_strings", &self.shared_strings.len())
            .field("sheets", &self.workbook.sheets().len())
            .field("fallback", &self.fallback)
            .finish()
    }
}
