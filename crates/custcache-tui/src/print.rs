//! Non-interactive output for `custcache --print`.
//!
//! Status lines go to stderr as they happen; the final table goes to stdout
//! as aligned text or as an HTML fragment.

use std::io::Write;

use anyhow::Result;
use custcache_core::{DisplaySink, Table};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Html,
}

pub struct PrintSink<E: Write> {
    format: OutputFormat,
    status_out: E,
    table: Option<Table>,
}

impl<E: Write> PrintSink<E> {
    pub fn new(format: OutputFormat, status_out: E) -> Self {
        Self {
            format,
            status_out,
            table: None,
        }
    }

    /// Write the last rendered table, if any. Returns whether one was written.
    pub fn finish(&self, out: &mut impl Write) -> Result<bool> {
        let Some(ref table) = self.table else {
            return Ok(false);
        };
        match self.format {
            OutputFormat::Text => writeln!(out, "{}", table.to_text())?,
            OutputFormat::Html => write!(out, "{}", table.to_html())?,
        }
        out.flush()?;
        Ok(true)
    }
}

impl<E: Write> DisplaySink for PrintSink<E> {
    fn report_status(&mut self, text: &str) {
        // Status output is best effort; a closed stderr must not abort the load
        let _ = writeln!(self.status_out, "{}", text);
    }

    fn render_rows(&mut self, headers: &[String], rows: &[Vec<String>]) {
        self.table = Some(Table {
            headers: headers.to_vec(),
            rows: rows.to_vec(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rows() -> (Vec<String>, Vec<Vec<String>>) {
        (
            vec!["Name".to_string(), "City".to_string()],
            vec![vec!["Ada".to_string(), "<London>".to_string()]],
        )
    }

    #[test]
    fn test_text_output() {
        let mut sink = PrintSink::new(OutputFormat::Text, Vec::new());
        let (headers, body) = rows();
        sink.report_status("Data loaded (1 customers)");
        sink.render_rows(&headers, &body);

        let mut out = Vec::new();
        assert!(sink.finish(&mut out).unwrap());
        let text = String::from_utf8(out).unwrap();
        assert!(text.starts_with("Name  City"));
        assert!(text.contains("Ada   <London>"));
        assert_eq!(
            String::from_utf8(sink.status_out.clone()).unwrap(),
            "Data loaded (1 customers)\n"
        );
    }

    #[test]
    fn test_html_output_is_escaped() {
        let mut sink = PrintSink::new(OutputFormat::Html, Vec::new());
        let (headers, body) = rows();
        sink.render_rows(&headers, &body);

        let mut out = Vec::new();
        sink.finish(&mut out).unwrap();
        let html = String::from_utf8(out).unwrap();
        assert!(html.contains("<td>&lt;London&gt;</td>"));
    }

    #[test]
    fn test_nothing_rendered() {
        let mut sink = PrintSink::new(OutputFormat::Text, Vec::new());
        sink.report_status("No data available offline yet");

        let mut out = Vec::new();
        assert!(!sink.finish(&mut out).unwrap());
        assert!(out.is_empty());
    }
}
