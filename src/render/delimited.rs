//! Delimiter-joined text renderer.
//!
//! Cells are written as-is: a value containing the delimiter or a line break
//! makes the output ambiguous. Use CSV when values may contain either.

use crate::model::{Row, Table};
use std::io::{self, Write};

/// Render a table as delimiter-joined lines.
pub fn render_delimited(table: &Table, delimiter: char) -> Vec<u8> {
    let mut buffer = Vec::new();
    for row in table.rows() {
        encode_row(row, delimiter, &mut buffer);
    }
    buffer
}

/// Write a table as delimiter-joined lines, returning the number of bytes written.
pub fn write_delimited<W: Write>(table: &Table, delimiter: char, writer: &mut W) -> io::Result<u64> {
    let mut buffer = Vec::with_capacity(256);
    let mut written = 0u64;

    for row in table.rows() {
        buffer.clear();
        encode_row(row, delimiter, &mut buffer);
        writer.write_all(&buffer)?;
        written += buffer.len() as u64;
    }

    Ok(written)
}

fn encode_row(row: &Row, delimiter: char, buffer: &mut Vec<u8>) {
    let mut sep = [0u8; 4];
    let sep = delimiter.encode_utf8(&mut sep).as_bytes();

    for (i, cell) in row.iter().enumerate() {
        if i > 0 {
            buffer.extend_from_slice(sep);
        }
        buffer.extend_from_slice(cell.as_bytes());
    }
    buffer.push(b'\n');
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(rows: &[&[&str]]) -> Table {
        rows.iter().map(|r| r.iter().copied().collect::<Row>()).collect()
    }

    #[test]
    fn test_tab_delimited() {
        let out = render_delimited(&table(&[&["a", "b"], &["c", "d", "e"]]), '\t');
        assert_eq!(String::from_utf8(out).unwrap(), "a\tb\nc\td\te\n");
    }

    #[test]
    fn test_no_escaping() {
        let out = render_delimited(&table(&[&["has\ttab", "\"quoted\"", "x,y"]]), '\t');
        assert_eq!(String::from_utf8(out).unwrap(), "has\ttab\t\"quoted\"\tx,y\n");
    }

    #[test]
    fn test_multibyte_delimiter() {
        let out = render_delimited(&table(&[&["a", "b"]]), '¦');
        assert_eq!(String::from_utf8(out).unwrap(), "a¦b\n");
    }

    #[test]
    fn test_render_matches_write() {
        let t = table(&[&["a", "b¦c"], &["", ""]]);
        let mut out = Vec::new();
        write_delimited(&t, '¦', &mut out).unwrap();
        assert_eq!(render_delimited(&t, '¦'), out);
    }

    #[test]
    fn test_write_counts_bytes() {
        let t = table(&[&["é", "b"], &[""]]);
        let mut out = Vec::new();
        let written = write_delimited(&t, ';', &mut out).unwrap();
        assert_eq!(written, out.len() as u64);
        assert_eq!(out, "é;b\n\n".as_bytes());
    }
}
