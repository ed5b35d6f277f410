//! Table model built from a sequence of records.
//!
//! The first record defines the columns; later records are laid out against
//! those columns even if their own keys differ. Every header and cell passes
//! through [`escape_cell`] before it leaves this module.

use crate::models::Record;
use crate::utils::humanize_header;

/// The single row shown when there is nothing to display.
pub const EMPTY_MESSAGE: &str = "No customers found";

/// Column separator used by [`Table::to_text`].
const TEXT_COLUMN_GAP: &str = "  ";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Table {
    /// Human-readable column labels. Empty for the placeholder table.
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl Table {
    pub fn build<'a>(records: impl IntoIterator<Item = &'a Record>) -> Self {
        let records: Vec<&Record> = records.into_iter().collect();

        let Some(first) = records.first() else {
            return Self::placeholder();
        };

        let columns: Vec<&str> = first.keys().collect();
        let headers = columns
            .iter()
            .map(|key| escape_cell(&humanize_header(key)))
            .collect();
        let rows = records
            .iter()
            .map(|record| {
                columns
                    .iter()
                    .map(|key| escape_cell(&record.display_value(key)))
                    .collect()
            })
            .collect();

        Self { headers, rows }
    }

    /// One informational row and no header.
    pub fn placeholder() -> Self {
        Self {
            headers: Vec::new(),
            rows: vec![vec![EMPTY_MESSAGE.to_string()]],
        }
    }

    /// True only for the informational table. A dataset whose first record
    /// has no keys still produces data rows, just with zero columns.
    pub fn is_placeholder(&self) -> bool {
        self.headers.is_empty()
            && matches!(self.rows.as_slice(), [row] if row.len() == 1 && row[0] == EMPTY_MESSAGE)
    }

    pub fn column_count(&self) -> usize {
        self.headers.len()
    }

    /// Display width of each column: the widest of header and cells.
    pub fn column_widths(&self) -> Vec<usize> {
        let mut widths: Vec<usize> = self.headers.iter().map(|h| h.chars().count()).collect();
        for row in &self.rows {
            for (width, cell) in widths.iter_mut().zip(row) {
                *width = (*width).max(cell.chars().count());
            }
        }
        widths
    }

    /// Aligned plain-text rendering, one line per row.
    pub fn to_text(&self) -> String {
        if self.is_placeholder() {
            return self
                .rows
                .iter()
                .map(|row| row.join(TEXT_COLUMN_GAP))
                .collect::<Vec<_>>()
                .join("\n");
        }

        let widths = self.column_widths();
        let format_line = |cells: &[String]| {
            cells
                .iter()
                .zip(&widths)
                .map(|(cell, width)| format!("{:<width$}", cell, width = *width))
                .collect::<Vec<_>>()
                .join(TEXT_COLUMN_GAP)
                .trim_end()
                .to_string()
        };

        let mut lines = Vec::with_capacity(self.rows.len() + 2);
        lines.push(format_line(&self.headers));
        lines.push(
            widths
                .iter()
                .map(|w| "-".repeat(*w))
                .collect::<Vec<_>>()
                .join(TEXT_COLUMN_GAP),
        );
        lines.extend(self.rows.iter().map(|row| format_line(row)));
        lines.join("\n")
    }

    /// Standalone HTML `<table>` with every value HTML-escaped.
    pub fn to_html(&self) -> String {
        let mut html = String::from("<table>\n");

        if !self.is_placeholder() {
            html.push_str("  <thead><tr>");
            for header in &self.headers {
                html.push_str(&format!("<th>{}</th>", escape_html(header)));
            }
            html.push_str("</tr></thead>\n");
        }

        html.push_str("  <tbody>\n");
        for row in &self.rows {
            html.push_str("    <tr>");
            for cell in row {
                html.push_str(&format!("<td>{}</td>", escape_html(cell)));
            }
            html.push_str("</tr>\n");
        }
        html.push_str("  </tbody>\n</table>\n");
        html
    }
}

/// Make a value safe to print on a terminal.
///
/// Control characters (ESC, CR, newlines, ...) are replaced with a visible
/// `\u{..}` escape so dataset contents cannot move the cursor or inject
/// terminal escape sequences.
pub fn escape_cell(value: &str) -> String {
    if !value.chars().any(char::is_control) {
        return value.to_string();
    }
    value
        .chars()
        .map(|c| {
            if c.is_control() {
                format!("\\u{{{:x}}}", c as u32)
            } else {
                c.to_string()
            }
        })
        .collect()
}

/// Escape text for inclusion in HTML element content or attributes.
pub fn escape_html(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
