//! ZIP package access for XLSX workbooks.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use std::fs::File;
use std::io::{self, BufReader, Cursor, Read};
use std::path::Path;

/// Local file header signature: PK\x03\x04
const ZIP_MAGIC: [u8; 4] = [0x50, 0x4B, 0x03, 0x04];

/// End of central directory signature, the first bytes of an empty archive.
const ZIP_EMPTY_MAGIC: [u8; 4] = [0x50, 0x4B, 0x05, 0x06];

/// Document properties from `docProps/core.xml`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoreProperties {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub creator: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub modified: Option<String>,
}

impl CoreProperties {
    /// True when no property was found.
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.creator.is_none()
            && self.created.is_none()
            && self.modified.is_none()
    }
}

/// An opened OOXML package.
///
/// The whole archive is held in memory; part names are captured once at open
/// time so lookups never touch the archive.
pub struct Package {
    archive: RefCell<zip::ZipArchive<Cursor<Vec<u8>>>>,
    entries: Vec<String>,
}

impl Package {
    /// Open a package from a file path.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use xlsxtab::container::Package;
    ///
    /// let package = Package::open("data.xlsx")?;
    /// println!("{} parts", package.entries().len());
    /// # Ok::<(), xlsxtab::Error>(())
    /// ```
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => Error::InputNotFound(path.to_path_buf()),
            _ => Error::Io(e),
        })?;
        Self::from_reader(BufReader::new(file))
    }

    /// Open a package from any reader. The reader is drained into memory.
    pub fn from_reader<R: Read>(mut reader: R) -> Result<Self> {
        let mut data = Vec::new();
        reader.read_to_end(&mut data)?;
        Self::from_bytes(data)
    }

    /// Open a package from its raw bytes.
    pub fn from_bytes(data: Vec<u8>) -> Result<Self> {
        if !data.starts_with(&ZIP_MAGIC) && !data.starts_with(&ZIP_EMPTY_MAGIC) {
            return Err(Error::NotAnArchive("missing ZIP signature".to_string()));
        }

        let archive = zip::ZipArchive::new(Cursor::new(data))
            .map_err(|e| Error::NotAnArchive(e.to_string()))?;
        let entries = archive
            .file_names()
            .filter(|name| !name.ends_with('/'))
            .map(String::from)
            .collect();

        Ok(Self {
            archive: RefCell::new(archive),
            entries,
        })
    }

    /// All part names, in archive order.
    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    /// Check if a part exists.
    pub fn contains(&self, name: &str) -> bool {
        self.entries.iter().any(|n| n == name)
    }

    /// Return the first candidate present in the package.
    pub fn find_part<S: AsRef<str>>(&self, candidates: &[S]) -> Option<&str> {
        candidates.iter().find_map(|candidate| {
            let candidate = candidate.as_ref();
            self.entries
                .iter()
                .find(|n| n.as_str() == candidate)
                .map(String::as_str)
        })
    }

    /// Lazily list the parts whose names start with `prefix` and end with `suffix`.
    pub fn list_parts<'a>(
        &'a self,
        prefix: &'a str,
        suffix: &'a str,
    ) -> impl Iterator<Item = &'a str> + 'a {
        self.entries
            .iter()
            .map(String::as_str)
            .filter(move |n| n.starts_with(prefix) && n.ends_with(suffix))
    }

    /// Read a part's raw bytes.
    pub fn read_part(&self, name: &str) -> Result<Vec<u8>> {
        let mut archive = self.archive.borrow_mut();
        let mut file = archive.by_name(name).map_err(|e| match e {
            zip::result::ZipError::FileNotFound => Error::MissingPart(name.to_string()),
            other => Error::NotAnArchive(format!("{name}: {other}")),
        })?;

        let mut data = Vec::new();
        file.read_to_end(&mut data)
            .map_err(|e| Error::NotAnArchive(format!("{name}: {e}")))?;
        Ok(data)
    }

    /// Read an XML part as a string, normalizing its text encoding.
    pub fn read_xml(&self, name: &str) -> Result<String> {
        let bytes = self.read_part(name)?;
        decode_xml_bytes(&bytes).map_err(|e| e.in_part(name))
    }

    /// Read title, creator and timestamps from `docProps/core.xml`.
    ///
    /// A missing part yields empty properties; unreadable markup stops the
    /// scan and keeps whatever was collected so far.
    pub fn core_properties(&self) -> CoreProperties {
        use quick_xml::events::Event;

        let mut props = CoreProperties::default();
        let Ok(xml) = self.read_xml("docProps/core.xml") else {
            return props;
        };

        let mut reader = quick_xml::Reader::from_str(&xml);
        reader.config_mut().trim_text(true);
        let mut buf = Vec::new();
        let mut current: Option<Vec<u8>> = None;

        loop {
            match reader.read_event_into(&mut buf) {
                Ok(Event::Start(e)) => current = Some(e.local_name().as_ref().to_vec()),
                Ok(Event::Text(e)) => {
                    let slot = match current.as_deref() {
                        Some(b"title") => Some(&mut props.title),
                        Some(b"creator") => Some(&mut props.creator),
                        Some(b"created") => Some(&mut props.created),
                        Some(b"modified") => Some(&mut props.modified),
                        _ => None,
                    };
                    if let (Some(slot), Ok(text)) = (slot, e.unescape()) {
                        *slot = Some(text.into_owned());
                    }
                }
                Ok(Event::End(_)) => current = None,
                Ok(Event::Eof) | Err(_) => break,
                _ => {}
            }
            buf.clear();
        }

        props
    }

    /// Resolve a relationship target against the part that declares it.
    pub fn resolve_path(base: &str, target: &str) -> String {
        if let Some(absolute) = target.strip_prefix('/') {
            return absolute.to_string();
        }

        let mut segments: Vec<&str> = base.split('/').collect();
        segments.pop();
        for segment in target.split('/') {
            match segment {
                "" | "." => {}
                ".." => {
                    segments.pop();
                }
                s => segments.push(s),
            }
        }
        segments.retain(|s| !s.is_empty());
        segments.join("/")
    }
}

impl std::fmt::Debug for Package {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Package")
            .field("parts", &self.entries.len())
            .finish()
    }
}

/// Decode XML bytes to a string.
///
/// Parts are normally UTF-8, but some producers write UTF-16 (LE or BE, with
/// or without a BOM). UTF-16 input has its declaration rewritten to UTF-8
/// since the returned string is UTF-8.
pub fn decode_xml_bytes(bytes: &[u8]) -> Result<String> {
    if let Some(rest) = bytes.strip_prefix(&[0xEF, 0xBB, 0xBF]) {
        return String::from_utf8(rest.to_vec()).map_err(|e| Error::malformed("<xml>", e));
    }
    if let Some(rest) = bytes.strip_prefix(&[0xFF, 0xFE]) {
        return decode_utf16(rest, u16::from_le_bytes).map(declare_utf8);
    }
    if let Some(rest) = bytes.strip_prefix(&[0xFE, 0xFF]) {
        return decode_utf16(rest, u16::from_be_bytes).map(declare_utf8);
    }

    match std::str::from_utf8(bytes) {
        Ok(s) => Ok(s.to_string()),
        // ASCII markup in UTF-16 leaves a zero byte in every code unit
        Err(_) if bytes.len() >= 4 && bytes[1] == 0 && bytes[3] == 0 => {
            decode_utf16(bytes, u16::from_le_bytes).map(declare_utf8)
        }
        Err(_) if bytes.len() >= 4 && bytes[0] == 0 && bytes[2] == 0 => {
            decode_utf16(bytes, u16::from_be_bytes).map(declare_utf8)
        }
        Err(_) => Ok(String::from_utf8_lossy(bytes).into_owned()),
    }
}

/// Element nesting seen while streaming a part.
///
/// The streaming reader reports `Eof` even with elements still open, and
/// accepts bare text as a document. `finish` turns both into errors.
#[derive(Debug, Default)]
pub(crate) struct ElementDepth {
    depth: usize,
    seen_root: bool,
}

impl ElementDepth {
    pub(crate) fn observe(&mut self, event: &quick_xml::events::Event<'_>) {
        use quick_xml::events::Event;

        match event {
            Event::Start(_) => {
                self.depth += 1;
                self.seen_root = true;
            }
            Event::End(_) => self.depth = self.depth.saturating_sub(1),
            Event::Empty(_) => self.seen_root = true,
            _ => {}
        }
    }

    /// Check the document was complete when `Eof` arrived.
    pub(crate) fn finish(&self) -> Result<()> {
        if !self.seen_root {
            return Err(Error::malformed("<xml>", "no root element"));
        }
        if self.depth != 0 {
            return Err(Error::malformed("<xml>", "unexpected end of document"));
        }
        Ok(())
    }
}

fn decode_utf16(bytes: &[u8], unit: fn([u8; 2]) -> u16) -> Result<String> {
    let units = bytes.chunks_exact(2).map(|pair| unit([pair[0], pair[1]]));
    char::decode_utf16(units)
        .collect::<std::result::Result<String, _>>()
        .map_err(|e| Error::malformed("<xml>", e))
}

/// Rewrite `encoding="UTF-16[LE|BE]"` in the XML declaration to UTF-8.
fn declare_utf8(xml: String) -> String {
    if !xml.starts_with("<?xml") {
        return xml;
    }
    let Some(end) = xml.find("?>") else {
        return xml;
    };

    let lowered = xml[..end].to_ascii_lowercase();
    let Some(start) = lowered.find("utf-16") else {
        return xml;
    };
    let mut stop = start + "utf-16".len();
    if lowered[stop..].starts_with("le") || lowered[stop..].starts_with("be") {
        stop += 2;
    }

    format!("{}UTF-8{}", &xml[..start], &xml[stop..])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_util::build_package;

    #[test]
    fn test_resolve_path() {
        assert_eq!(
            Package::resolve_path("xl/workbook.xml", "worksheets/sheet1.xml"),
            "xl/worksheets/sheet1.xml"
        );
        assert_eq!(
            Package::resolve_path("xl/workbook.xml", "/xl/worksheets/sheet2.xml"),
            "xl/worksheets/sheet2.xml"
        );
        assert_eq!(
            Package::resolve_path("xl/worksheets/sheet1.xml", "../sharedStrings.xml"),
            "xl/sharedStrings.xml"
        );
        assert_eq!(
            Package::resolve_path("xl/workbook.xml", "./worksheets/a.xml"),
            "xl/worksheets/a.xml"
        );
    }

    #[test]
    fn test_find_part_prefers_earlier_candidate() {
        let package = build_package(&[
            ("xl/worksheets/sheet2.xml", "<worksheet/>"),
            ("xl/worksheets/2.xml", "<worksheet/>"),
        ]);

        let hit = package.find_part(&["xl/worksheets/2.xml", "xl/worksheets/sheet2.xml"]);
        assert_eq!(hit, Some("xl/worksheets/2.xml"));

        let hit = package.find_part(&["xl/missing.xml", "xl/worksheets/sheet2.xml"]);
        assert_eq!(hit, Some("xl/worksheets/sheet2.xml"));

        assert_eq!(package.find_part(&["nope.xml"]), None);
        assert_eq!(package.find_part::<&str>(&[]), None);
    }

    #[test]
    fn test_list_parts() {
        let package = build_package(&[
            ("xl/worksheets/sheet1.xml", "<worksheet/>"),
            ("xl/worksheets/_rels/sheet1.xml.rels", "<Relationships/>"),
            ("xl/worksheets/sheet3.xml", "<worksheet/>"),
            ("xl/sharedStrings.xml", "<sst/>"),
        ]);

        let sheets: Vec<&str> = package.list_parts("xl/worksheets/", ".xml").collect();
        assert_eq!(
            sheets,
            vec!["xl/worksheets/sheet1.xml", "xl/worksheets/sheet3.xml"]
        );
    }

    #[test]
    fn test_read_missing_part() {
        let package = build_package(&[("xl/workbook.xml", "<workbook/>")]);
        assert!(package.contains("xl/workbook.xml"));
        let err = package.read_xml("xl/sharedStrings.xml").unwrap_err();
        assert!(matches!(err, Error::MissingPart(ref p) if p == "xl/sharedStrings.xml"));
    }

    #[test]
    fn test_not_an_archive() {
        let err = Package::from_bytes(b"this is not a zip file".to_vec()).unwrap_err();
        assert!(matches!(err, Error::NotAnArchive(_)));

        // Signature present but the archive body is garbage
        let mut bytes = ZIP_MAGIC.to_vec();
        bytes.extend_from_slice(&[0u8; 64]);
        let err = Package::from_bytes(bytes).unwrap_err();
        assert!(matches!(err, Error::NotAnArchive(_)));
    }

    #[test]
    fn test_open_missing_file() {
        let err = Package::open("definitely/not/here.xlsx").unwrap_err();
        assert!(matches!(err, Error::InputNotFound(_)));
        assert_eq!(err.stage(), "open");
    }

    #[test]
    fn test_core_properties() {
        let package = build_package(&[(
            "docProps/core.xml",
            r#"<?xml version="1.0" encoding="UTF-8"?>
<cp:coreProperties xmlns:cp="http://schemas.openxmlformats.org/package/2006/metadata/core-properties"
    xmlns:dc="http://purl.org/dc/elements/1.1/" xmlns:dcterms="http://purl.org/dc/terms/">
  <dc:title>Budget</dc:title>
  <dc:creator>Ada</dc:creator>
  <dcterms:modified>2024-01-02T03:04:05Z</dcterms:modified>
</cp:coreProperties>"#,
        )]);

        let props = package.core_properties();
        assert_eq!(props.title.as_deref(), Some("Budget"));
        assert_eq!(props.creator.as_deref(), Some("Ada"));
        assert_eq!(props.created, None);
        assert_eq!(props.modified.as_deref(), Some("2024-01-02T03:04:05Z"));

        let empty = build_package(&[("xl/workbook.xml", "<workbook/>")]);
        assert!(empty.core_properties().is_empty());
    }

    #[test]
    fn test_decode_xml_bytes() {
        let utf16_le = b"\xFF\xFE<\0a\0>\0";
        assert_eq!(decode_xml_bytes(utf16_le).unwrap(), "<a>");

        let utf16_be = b"\xFE\xFF\0<\0a\0>";
        assert_eq!(decode_xml_bytes(utf16_be).unwrap(), "<a>");

        let utf8_bom = b"\xEF\xBB\xBF<a>";
        assert_eq!(decode_xml_bytes(utf8_bom).unwrap(), "<a>");

        assert_eq!(decode_xml_bytes(b"<a>").unwrap(), "<a>");
    }

    #[test]
    fn test_utf16_declaration_rewritten() {
        let xml = r#"<?xml version="1.0" encoding="UTF-16LE"?><a/>"#;
        let mut bytes = vec![0xFF, 0xFE];
        for unit in xml.encode_utf16() {
            bytes.extend_from_slice(&unit.to_le_bytes());
        }

        let decoded = decode_xml_bytes(&bytes).unwrap();
        assert_eq!(decoded, r#"<?xml version="1.0" encoding="UTF-8"?><a/>"#);
    }

    fn depth_of(xml: &str) -> Result<()> {
        let mut reader = quick_xml::Reader::from_str(xml);
        let mut depth = ElementDepth::default();
        loop {
            let event = reader.read_event()?;
            depth.observe(&event);
            if matches!(event, quick_xml::events::Event::Eof) {
                return depth.finish();
            }
        }
    }

    #[test]
    fn test_element_depth() {
        assert!(depth_of("<a><b/></a>").is_ok());
        assert!(depth_of("<?xml version=\"1.0\"?><a/>").is_ok());
        assert!(matches!(depth_of("<a><b>"), Err(Error::MalformedMarkup { .. })));
        assert!(matches!(depth_of("plain text"), Err(Error::MalformedMarkup { .. })));
        assert!(matches!(depth_of(""), Err(Error::MalformedMarkup { .. })));
    }
}
