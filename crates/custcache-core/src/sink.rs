//! The display surface the core draws into.

/// Somewhere to report status and to put table rows.
///
/// The terminal UI, the `--print` mode and the tests each provide one.
pub trait DisplaySink {
    fn report_status(&mut self, text: &str);

    /// Replace the displayed table. When there is nothing to show, `headers`
    /// is empty and `rows` holds a single one-cell informational row. Empty
    /// `headers` with any other `rows` is data with zero columns.
    fn render_rows(&mut self, headers: &[String], rows: &[Vec<String>]);
}

/// Sink that remembers everything it was given.
#[cfg(test)]
#[derive(Debug, Default)]
pub(crate) struct RecordingSink {
    pub statuses: Vec<String>,
    pub renders: Vec<(Vec<String>, Vec<Vec<String>>)>,
}

#[cfg(test)]
impl RecordingSink {
    pub fn last_status(&self) -> &str {
        self.statuses.last().map(String::as_str).unwrap_or_default()
    }

    pub fn last_rows(&self) -> Option<&Vec<Vec<String>>> {
        self.renders.last().map(|(_, rows)| rows)
    }
}

#[cfg(test)]
impl DisplaySink for RecordingSink {
    fn report_status(&mut self, text: &str) {
        self.statuses.push(text.to_string());
    }

    fn render_rows(&mut self, headers: &[String], rows: &[Vec<String>]) {
        self.renders.push((headers.to_vec(), rows.to_vec()));
    }
}
