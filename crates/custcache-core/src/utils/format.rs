/// Case-insensitive substring check.
/// `needle` must already be lowercased.
pub fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(needle)
}

/// Turn a column key into a header label (`first_name` -> `first name`).
///
/// Every underscore becomes a space, not only the first, so
/// `date_of_birth` reads `date of birth`.
pub fn humanize_header(key: &str) -> String {
    key.replace('_', " ")
}

/// Truncate a string to a maximum number of characters, adding an ellipsis
/// if needed.
pub fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else if max_len <= 3 {
        s.chars().take(max_len).collect()
    } else {
        let truncated: String = s.chars().take(max_len - 3).collect();
        format!("{}...", truncated)
    }
}
