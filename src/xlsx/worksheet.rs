//! Worksheet resolution and row/cell decoding.

use crate::container::{ElementDepth, Package};
use crate::error::{Error, Result};
use crate::model::{Row, Table};
use quick_xml::events::{BytesStart, BytesText, Event};

use super::shared_strings::SharedStrings;
use super::workbook::WorkbookIndex;

/// Directory holding worksheet parts.
pub const WORKSHEETS_DIR: &str = "xl/worksheets/";

/// Part used when no identifier is given, or when fallback is enabled.
pub const DEFAULT_SHEET_PART: &str = "xl/worksheets/sheet1.xml";

/// How a cell's raw value should be read, from its `t` attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellType {
    /// `t="n"` or no type attribute
    Number,
    /// `t="s"`: the value is an index into the shared strings
    SharedString,
    /// `t="inlineStr"`: the value lives in an `<is>` child
    InlineString,
    /// Booleans, errors, cached formula strings, dates
    Other,
}

impl CellType {
    fn from_attr(value: Option<&[u8]>) -> Self {
        match value {
            None | Some(b"n") => CellType::Number,
            Some(b"s") => CellType::SharedString,
            Some(b"inlineStr") => CellType::InlineString,
            Some(_) => CellType::Other,
        }
    }
}

/// A cell as written in the sheet, before shared-string resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawCell {
    /// 0-based column from the `r` reference, when present
    pub column: Option<u32>,
    /// Text of the value element, empty when there is none
    pub raw: String,
    pub kind: CellType,
}

impl RawCell {
    fn from_start(e: &BytesStart<'_>) -> Self {
        let mut column = None;
        let mut kind = CellType::Number;

        for attr in e.attributes().flatten() {
            match attr.key.local_name().as_ref() {
                b"r" => column = column_index(&String::from_utf8_lossy(&attr.value)),
                b"t" => kind = CellType::from_attr(Some(attr.value.as_ref())),
                _ => {}
            }
        }

        Self {
            column,
            raw: String::new(),
            kind,
        }
    }

    /// Produce the cell's display value.
    ///
    /// A shared-string cell whose index does not parse or does not resolve
    /// keeps its raw text; every other cell is returned verbatim.
    pub fn resolve(self, shared_strings: &SharedStrings) -> String {
        if self.kind != CellType::SharedString {
            return self.raw;
        }

        match self.raw.parse::<usize>() {
            Ok(index) => match shared_strings.lookup(index) {
                Ok(text) => text.to_string(),
                Err(e) => {
                    log::debug!("{e}; keeping raw value");
                    self.raw
                }
            },
            Err(_) => {
                log::debug!("shared string index '{}' is not a number; keeping raw value", self.raw);
                self.raw
            }
        }
    }
}

/// Convert a cell reference such as `AB12` to a 0-based column index.
pub fn column_index(reference: &str) -> Option<u32> {
    let letters = reference
        .bytes()
        .take_while(|b| b.is_ascii_alphabetic())
        .collect::<Vec<_>>();
    if letters.is_empty() {
        return None;
    }

    let mut column: u32 = 0;
    for letter in letters {
        let digit = u32::from(letter.to_ascii_uppercase() - b'A') + 1;
        column = column.checked_mul(26)?.checked_add(digit)?;
    }
    Some(column - 1)
}

/// Candidate part names for a sheet identifier, in precedence order.
pub fn sheet_candidates(sheet: &str) -> [String; 2] {
    [
        format!("{WORKSHEETS_DIR}{sheet}.xml"),
        format!("{WORKSHEETS_DIR}sheet{sheet}.xml"),
    ]
}

/// Find the worksheet part for `sheet`.
///
/// Tried in order: `xl/worksheets/<sheet>.xml`, `xl/worksheets/sheet<sheet>.xml`,
/// then a sheet of that display name in the workbook. The identifier is
/// matched exactly as given, without trimming. An empty identifier
/// selects `sheet1.xml` (or the first sheet of the workbook). With
/// `fallback` set, an unmatched identifier also lands on `sheet1.xml`.
///
/// On failure every worksheet part is listed in the error and in the log.
pub fn resolve_sheet_part(
    package: &Package,
    workbook: &WorkbookIndex,
    sheet: &str,
    fallback: bool,
) -> Result<String> {
    if !sheet.is_empty() {
        if let Some(part) = package.find_part(&sheet_candidates(sheet)) {
            return Ok(part.to_string());
        }
        if let Some(part) = workbook
            .part_for_name(sheet)
            .filter(|part| package.contains(part))
        {
            return Ok(part.to_string());
        }
    }

    if sheet.is_empty() || fallback {
        if package.contains(DEFAULT_SHEET_PART) {
            if !sheet.is_empty() {
                log::warn!("sheet '{sheet}' not found, falling back to {DEFAULT_SHEET_PART}");
            }
            return Ok(DEFAULT_SHEET_PART.to_string());
        }
        if let Some(part) = workbook
            .sheets()
            .iter()
            .filter_map(|s| s.part.as_deref())
            .find(|part| package.contains(part))
        {
            return Ok(part.to_string());
        }
    }

    let available: Vec<String> = package
        .list_parts(WORKSHEETS_DIR, ".xml")
        .map(String::from)
        .collect();
    log::info!(
        "no worksheet matches '{sheet}'; available parts: [{}]",
        available.join(", ")
    );

    Err(Error::SheetNotFound {
        requested: sheet.to_string(),
        available,
    })
}

/// Resolve and decode one sheet of a package.
///
/// Resolution is strict: an identifier that matches nothing fails with
/// [`Error::SheetNotFound`] instead of falling back to the first sheet.
pub fn decode(package: &Package, sheet: &str, shared_strings: &SharedStrings) -> Result<Table> {
    let workbook = WorkbookIndex::load_or_empty(package);
    let part = resolve_sheet_part(package, &workbook, sheet, false)?;
    decode_part(package, &part, shared_strings)
}

/// Decode a worksheet part by name.
pub fn decode_part(package: &Package, part: &str, shared_strings: &SharedStrings) -> Result<Table> {
    let xml = package.read_xml(part)?;
    let table = decode_worksheet(&xml, shared_strings).map_err(|e| e.in_part(part))?;
    log::debug!("decoded {} rows from {part}", table.len());
    Ok(table)
}

/// Decode worksheet markup into a table.
///
/// Every `<c>` of a `<row>` yields one value, in document order; column
/// references are not used to place cells, so skipped columns leave no gap.
/// Rows without any `<c>` are dropped.
pub fn decode_worksheet(xml: &str, shared_strings: &SharedStrings) -> Result<Table> {
    let mut reader = quick_xml::Reader::from_str(xml);
    let mut buf = Vec::new();
    let mut depth = ElementDepth::default();

    let mut rows = Vec::new();
    let mut row: Option<Vec<String>> = None;
    let mut row_number = 0usize;
    let mut misaligned = false;

    let mut cell: Option<RawCell> = None;
    let mut capture = false;
    let mut has_value = false;
    let mut in_inline = false;
    let mut in_phonetic = false;

    loop {
        let event = reader.read_event_into(&mut buf);
        if let Ok(e) = &event {
            depth.observe(e);
        }
        match event {
            Ok(Event::Start(e)) => match e.local_name().as_ref() {
                b"row" => {
                    row = Some(Vec::new());
                    row_number += 1;
                    misaligned = false;
                }
                b"c" if row.is_some() => {
                    cell = Some(RawCell::from_start(&e));
                    has_value = false;
                }
                b"v" if cell.is_some() && !has_value => capture = true,
                b"is" if cell.is_some() && !has_value => in_inline = true,
                b"rPh" => in_phonetic = true,
                b"t" if in_inline && !in_phonetic => capture = true,
                _ => {}
            },
            Ok(Event::Empty(e)) => match e.local_name().as_ref() {
                b"c" => {
                    if let Some(cells) = row.as_mut() {
                        let raw = RawCell::from_start(&e);
                        misaligned |= raw.column.is_some_and(|c| c as usize != cells.len());
                        cells.push(raw.resolve(shared_strings));
                    }
                }
                b"v" if cell.is_some() => has_value = true,
                _ => {}
            },
            Ok(Event::Text(e)) if capture => {
                if let Some(c) = cell.as_mut() {
                    c.raw.push_str(&unescape(&e)?);
                }
            }
            Ok(Event::CData(e)) if capture => {
                if let Some(c) = cell.as_mut() {
                    c.raw.push_str(&String::from_utf8_lossy(&e.into_inner()));
                }
            }
            Ok(Event::End(e)) => match e.local_name().as_ref() {
                b"v" => {
                    if capture {
                        has_value = true;
                    }
                    capture = false;
                }
                b"t" => capture = false,
                b"rPh" => in_phonetic = false,
                b"is" => {
                    if in_inline {
                        has_value = true;
                    }
                    in_inline = false;
                }
                b"c" => {
                    if let (Some(raw), Some(cells)) = (cell.take(), row.as_mut()) {
                        misaligned |= raw.column.is_some_and(|c| c as usize != cells.len());
                        cells.push(raw.resolve(shared_strings));
                    }
                    capture = false;
                    in_inline = false;
                }
                b"row" => {
                    if let Some(cells) = row.take() {
                        if misaligned {
                            log::debug!(
                                "row {row_number}: column references skip positions; cells kept in document order"
                            );
                        }
                        if !cells.is_empty() {
                            rows.push(Row::new(cells));
                        }
                    }
                }
                _ => {}
            },
            Ok(Event::Eof) => {
                depth.finish()?;
                break;
            }
            Err(e) => return Err(e.into()),
            _ => {}
        }
        buf.clear();
    }

    Ok(Table::from_rows(rows))
}

fn unescape(text: &BytesText<'_>) -> Result<String> {
    text.unescape()
        .map(|t| t.into_owned())
        .map_err(|e| Error::malformed("<xml>", e))
}
