//! Sheet names and part locations from `xl/workbook.xml`.

use crate::container::{ElementDepth, Package};
use crate::error::Result;
use quick_xml::events::Event;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

const WORKBOOK_PART: &str = "xl/workbook.xml";
const WORKBOOK_RELS_PART: &str = "xl/_rels/workbook.xml.rels";

/// One `<sheet>` declared by the workbook.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SheetEntry {
    /// Display name shown on the sheet tab
    pub name: String,
    /// `sheetId` attribute
    pub sheet_id: String,
    /// Worksheet part the relationship points at, when it resolves
    pub part: Option<String>,
}

/// Sheets declared by a workbook, in tab order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WorkbookIndex {
    sheets: Vec<SheetEntry>,
}

impl WorkbookIndex {
    /// Load the index from a package.
    ///
    /// Hand-built packages often carry only worksheet parts, so a missing
    /// workbook or relationships part yields an empty index.
    pub fn load(package: &Package) -> Result<Self> {
        if !package.contains(WORKBOOK_PART) {
            return Ok(Self::default());
        }

        let workbook = package.read_xml(WORKBOOK_PART)?;
        let rels = if package.contains(WORKBOOK_RELS_PART) {
            Some(package.read_xml(WORKBOOK_RELS_PART)?)
        } else {
            None
        };

        Self::parse(&workbook, rels.as_deref()).map_err(|e| e.in_part(WORKBOOK_PART))
    }

    /// Load the index, treating an unreadable workbook part as empty.
    ///
    /// Sheet names only add a lookup path; the worksheet parts themselves
    /// stay reachable by part name.
    pub fn load_or_empty(package: &Package) -> Self {
        Self::load(package).unwrap_or_else(|e| {
            log::warn!("ignoring workbook sheet names: {e}");
            Self::default()
        })
    }

    /// Parse workbook markup, resolving sheet parts through the relationships.
    pub fn parse(workbook_xml: &str, rels_xml: Option<&str>) -> Result<Self> {
        let targets = match rels_xml {
            Some(xml) => parse_relationships(xml).map_err(|e| e.in_part(WORKBOOK_RELS_PART))?,
            None => HashMap::new(),
        };

        let mut sheets = Vec::new();
        let mut reader = quick_xml::Reader::from_str(workbook_xml);
        let mut buf = Vec::new();
        let mut depth = ElementDepth::default();

        loop {
            let event = reader.read_event_into(&mut buf);
            if let Ok(e) = &event {
                depth.observe(e);
            }
            match event {
                Ok(Event::Empty(e)) | Ok(Event::Start(e)) if e.local_name().as_ref() == b"sheet" => {
                    let mut name = String::new();
                    let mut sheet_id = String::new();
                    let mut rel_id = String::new();

                    for attr in e.attributes().flatten() {
                        let value = attr.unescape_value().map(|v| v.into_owned());
                        match attr.key.local_name().as_ref() {
                            b"name" => name = value.unwrap_or_default(),
                            b"sheetId" => sheet_id = value.unwrap_or_default(),
                            b"id" => rel_id = value.unwrap_or_default(),
                            _ => {}
                        }
                    }

                    if !name.is_empty() {
                        let part = targets
                            .get(&rel_id)
                            .map(|target| Package::resolve_path(WORKBOOK_PART, target));
                        sheets.push(SheetEntry {
                            name,
                            sheet_id,
                            part,
                        });
                    }
                }
                Ok(Event::Eof) => {
                    depth.finish()?;
                    break;
                }
                Err(e) => return Err(e.into()),
                _ => {}
            }
            buf.clear();
        }

        Ok(Self { sheets })
    }

    /// Declared sheets in tab order.
    pub fn sheets(&self) -> &[SheetEntry] {
        &self.sheets
    }

    /// Worksheet part of the sheet with this display name (ASCII case-insensitive).
    pub fn part_for_name(&self, name: &str) -> Option<&str> {
        self.sheets
            .iter()
            .find(|s| s.name.eq_ignore_ascii_case(name))
            .and_then(|s| s.part.as_deref())
    }
}

/// Map relationship ids to internal targets.
fn parse_relationships(xml: &str) -> Result<HashMap<String, String>> {
    let mut targets = HashMap::new();
    let mut reader = quick_xml::Reader::from_str(xml);
    let mut buf = Vec::new();
    let mut depth = ElementDepth::default();

    loop {
        let event = reader.read_event_into(&mut buf);
        if let Ok(e) = &event {
            depth.observe(e);
        }
        match event {
            Ok(Event::Empty(e)) | Ok(Event::Start(e))
                if e.local_name().as_ref() == b"Relationship" =>
            {
                let mut id = String::new();
                let mut target = String::new();
                let mut external = false;

                for attr in e.attributes().flatten() {
                    let value = String::from_utf8_lossy(&attr.value).into_owned();
                    match attr.key.as_ref() {
                        b"Id" => id = value,
                        b"Target" => target = value,
                        b"TargetMode" => external = value.eq_ignore_ascii_case("external"),
                        _ => {}
                    }
                }

                if !id.is_empty() && !target.is_empty() && !external {
                    targets.insert(id, target);
                }
            }
            Ok(Event::Eof) => {
                depth.finish()?;
                break;
            }
            Err(e) => return Err(e.into()),
            _ => {}
        }
        buf.clear();
    }

    Ok(targets)
}
