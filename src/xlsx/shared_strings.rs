//! XLSX shared strings parsing.

use crate::container::{ElementDepth, Package};
use crate::error::{Error, Result};
use quick_xml::events::Event;

/// Part names tried, in order, when loading the table from a package.
const SHARED_STRINGS_PARTS: [&str; 2] = ["xl/sharedStrings.xml", "xl/SharedStrings.xml"];

/// Shared strings table.
///
/// Entry `i` is the text of the `i`-th `<si>` record of the part.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SharedStrings {
    strings: Vec<String>,
}

impl SharedStrings {
    /// Load the table from a package.
    ///
    /// A workbook with only numbers or inline strings carries no
    /// shared-strings part; that yields an empty table.
    pub fn load(package: &Package) -> Result<Self> {
        let Some(part) = package.find_part(&SHARED_STRINGS_PARTS) else {
            log::debug!("no shared strings part, using an empty table");
            return Ok(Self::default());
        };

        let xml = package.read_xml(part)?;
        let table = Self::parse(&xml).map_err(|e| e.in_part(part))?;
        log::debug!("loaded {} shared strings from {part}", table.len());
        Ok(table)
    }

    /// Parse shared strings from XML content.
    ///
    /// Rich text runs of one `<si>` are concatenated into a single entry.
    /// Phonetic hints (`<rPh>`) are not part of the cell text and are skipped.
    pub fn parse(xml: &str) -> Result<Self> {
        let mut strings = Vec::new();
        let mut reader = quick_xml::Reader::from_str(xml);

        let mut buf = Vec::new();
        let mut depth = ElementDepth::default();
        let mut in_si = false;
        let mut in_t = false;
        let mut in_phonetic = false;
        let mut current = String::new();

        loop {
            let event = reader.read_event_into(&mut buf);
            if let Ok(e) = &event {
                depth.observe(e);
            }
            match event {
                Ok(Event::Start(e)) => match e.local_name().as_ref() {
                    b"si" => {
                        in_si = true;
                        current.clear();
                    }
                    b"rPh" => in_phonetic = true,
                    b"t" if in_si && !in_phonetic => in_t = true,
                    _ => {}
                },
                Ok(Event::Empty(e)) if e.local_name().as_ref() == b"si" => {
                    strings.push(String::new());
                }
                Ok(Event::Text(e)) if in_t => current.push_str(&e.unescape()?),
                Ok(Event::CData(e)) if in_t => {
                    current.push_str(&String::from_utf8_lossy(&e.into_inner()));
                }
                Ok(Event::End(e)) => match e.local_name().as_ref() {
                    b"si" => {
                        strings.push(std::mem::take(&mut current));
                        in_si = false;
                    }
                    b"rPh" => in_phonetic = false,
                    b"t" => in_t = false,
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

        Ok(Self { strings })
    }

    /// Resolve an index, failing when it is out of range.
    pub fn lookup(&self, index: usize) -> Result<&str> {
        self.get(index).ok_or(Error::IndexOutOfRange {
            index,
            len: self.strings.len(),
        })
    }

    /// Get a string by index.
    pub fn get(&self, index: usize) -> Option<&str> {
        self.strings.get(index).map(|s| s.as_str())
    }

    /// Get the count of shared strings.
    pub fn len(&self) -> usize {
        self.strings.len()
    }

    /// Check if empty.
    pub fn is_empty(&self) -> bool {
        self.strings.is_empty()
    }
}
