//! CSV renderer.

use crate::model::{Row, Table};
use std::io::{self, Write};

const DELIMITER: u8 = b',';
const QUOTE: u8 = b'"';

/// Render a table as CSV.
///
/// One `\n`-terminated line per row. A cell is quoted, with embedded quotes
/// doubled, when it contains a comma, a quote or a line break.
pub fn render_csv(table: &Table) -> Vec<u8> {
    let mut buffer = Vec::new();
    for row in table.rows() {
        encode_row(row, &mut buffer);
    }
    buffer
}

/// Write a table as CSV, returning the number of bytes written.
pub fn write_csv<W: Write>(table: &Table, writer: &mut W) -> io::Result<u64> {
    let mut buffer = Vec::with_capacity(256);
    let mut written = 0u64;

    for row in table.rows() {
        buffer.clear();
        encode_row(row, &mut buffer);
        writer.write_all(&buffer)?;
        written += buffer.len() as u64;
    }

    Ok(written)
}

fn encode_row(row: &Row, buffer: &mut Vec<u8>) {
    // A lone empty field would be a blank line, which CSV readers skip
    if row.len() == 1 && row.get(0) == Some("") {
        buffer.extend_from_slice(b"\"\"\n");
        return;
    }

    for (i, cell) in row.iter().enumerate() {
        if i > 0 {
            buffer.push(DELIMITER);
        }
        encode_field(cell, buffer);
    }
    buffer.push(b'\n');
}

fn encode_field(field: &str, buffer: &mut Vec<u8>) {
    if !needs_quoting(field) {
        buffer.extend_from_slice(field.as_bytes());
        return;
    }

    buffer.push(QUOTE);
    for byte in field.bytes() {
        if byte == QUOTE {
            buffer.push(QUOTE);
        }
        buffer.push(byte);
    }
    buffer.push(QUOTE);
}

fn needs_quoting(field: &str) -> bool {
    field
        .bytes()
        .any(|b| b == DELIMITER || b == QUOTE || b == b'\n' || b == b'\r')
}
