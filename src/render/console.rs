//! Console preview renderer.

use crate::model::Table;
use unicode_width::UnicodeWidthChar;

use super::options::PreviewOptions;

/// Render the first rows of a table for display.
///
/// Each shown row is one line of at most `max_cols` cells. Rows with more
/// cells end with a note of how many were left out, and a final line counts
/// the rows left out.
pub fn render_console(table: &Table, options: &PreviewOptions) -> String {
    if table.is_empty() {
        return "(no rows)\n".to_string();
    }

    let mut output = String::new();

    for (i, row) in table.rows().iter().take(options.max_rows).enumerate() {
        let shown: Vec<String> = row
            .iter()
            .take(options.max_cols)
            .map(|cell| clip(cell, options.max_cell_width))
            .collect();

        output.push_str(&format!("Row {}: {}", i + 1, shown.join(&options.separator)));

        let hidden = row.len().saturating_sub(options.max_cols);
        if hidden > 0 {
            output.push_str(&format!(" ... (+{hidden} more columns)"));
        }
        output.push('\n');
    }

    let hidden_rows = table.len().saturating_sub(options.max_rows);
    if hidden_rows > 0 {
        output.push_str(&format!("... (+{hidden_rows} more rows)\n"));
    }

    output
}

/// Shorten `text` to `width` display columns, ending with an ellipsis.
fn clip(text: &str, width: Option<usize>) -> String {
    // Line breaks would split the preview row
    let text = text.replace(['\r', '\n'], " ");
    let Some(width) = width else {
        return text;
    };

    let mut used = 0;
    let mut clipped = String::new();
    for ch in text.chars() {
        let w = ch.width().unwrap_or(0);
        if used + w > width.saturating_sub(1) {
            let rest_fits = text[clipped.len()..]
                .chars()
                .map(|c| c.width().unwrap_or(0))
                .sum::<usize>()
                + used
                <= width;
            if rest_fits {
                return text;
            }
            clipped.push('…');
            return clipped;
        }
        used += w;
        clipped.push(ch);
    }
    clipped
}
