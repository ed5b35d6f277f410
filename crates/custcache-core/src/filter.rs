//! Row selection: scoping the dataset to the active user, and free-text
//! search within that scope.

use crate::models::record::value_text;
use crate::models::Record;
use crate::utils::contains_ignore_case;

/// Keep only the records owned by `identity`.
///
/// With no identity (or one that is blank after trimming) every record is
/// returned in order. Otherwise a record is kept when its `field`, trimmed,
/// equals the trimmed identity exactly. Matching is case-sensitive, and a
/// record without the field is dropped.
pub fn user_filter<'a>(
    records: impl IntoIterator<Item = &'a Record>,
    identity: Option<&str>,
    field: &str,
) -> Vec<&'a Record> {
    let identity = identity.map(str::trim).filter(|id| !id.is_empty());

    match identity {
        None => records.into_iter().collect(),
        Some(id) => records
            .into_iter()
            .filter(|record| {
                record
                    .field_text(field)
                    .is_some_and(|value| value.trim() == id)
            })
            .collect(),
    }
}

/// Check if any field of a record contains the query.
/// Query should already be lowercased.
fn record_matches_search(record: &Record, query: &str) -> bool {
    record
        .values()
        .any(|value| contains_ignore_case(&value_text(value), query))
}

/// Records in `scope` with at least one field containing `term`,
/// ignoring case. An empty term returns the whole scope.
pub fn search<'a>(scope: impl IntoIterator<Item = &'a Record>, term: &str) -> Vec<&'a Record> {
    if term.is_empty() {
        return scope.into_iter().collect();
    }

    let query = term.to_lowercase();
    scope
        .into_iter()
        .filter(|record| record_matches_search(record, &query))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    const FIELD: &str = "Cody Code";

    fn customers() -> Vec<Record> {
        serde_json::from_value(json!([
            {"Name": "Acme Corp", "City": "Boston", "Cody Code": "X1", "Balance": 1200},
            {"Name": "Birch Ltd", "City": "Austin", "Cody Code": " X2 ", "Balance": 0},
            {"Name": "Cedar Inc", "City": "boston", "Cody Code": "X1", "Balance": null},
            {"Name": "Delta LLC", "City": "Denver"},
        ]))
        .unwrap()
    }

    fn names(records: &[&Record]) -> Vec<String> {
        records.iter().map(|r| r.display_value("Name")).collect()
    }

    // -------------------------------------------------------------------------
    // User filter
    // -------------------------------------------------------------------------

    #[test]
    fn test_user_filter_without_identity_returns_everything() {
        let data = customers();
        for identity in [None, Some(""), Some("   ")] {
            let result = user_filter(&data, identity, FIELD);
            assert_eq!(result.len(), data.len());
            assert!(result.iter().zip(&data).all(|(a, b)| std::ptr::eq(*a, b)));
        }
    }

    #[test]
    fn test_user_filter_matches_trimmed_values() {
        let data = customers();
        assert_eq!(
            names(&user_filter(&data, Some("X1"), FIELD)),
            vec!["Acme Corp", "Cedar Inc"]
        );
        // Record value " X2 " and identity "X2  " both trim to "X2"
        assert_eq!(names(&user_filter(&data, Some("X2  "), FIELD)), vec!["Birch Ltd"]);
    }

    #[test]
    fn test_user_filter_is_case_sensitive() {
        let data: Vec<Record> = serde_json::from_value(json!([
            {"Name": "A", "Cody Code": "X1"},
            {"Name": "B", "Cody Code": "X2"},
        ]))
        .unwrap();

        assert!(user_filter(&data, Some("x1 "), FIELD).is_empty());
        assert_eq!(names(&user_filter(&data, Some("X1 "), FIELD)), vec!["A"]);
    }

    #[test]
    fn test_user_filter_excludes_records_without_field() {
        let data = customers();
        let result = user_filter(&data, Some("X9"), FIELD);
        assert!(result.is_empty());

        let with_null = vec![Record::new().with("Name", "N").with(FIELD, Value::Null)];
        assert!(user_filter(&with_null, Some("null"), FIELD).is_empty());
    }

    #[test]
    fn test_user_filter_numeric_identity_field() {
        let data = vec![
            Record::new().with("Name", "Num").with("Rep", 42),
            Record::new().with("Name", "Str").with("Rep", "42"),
        ];
        assert_eq!(names(&user_filter(&data, Some("42"), "Rep")), vec!["Num", "Str"]);
    }

    #[test]
    fn test_user_filter_only_returns_matching() {
        let data = customers();
        for id in ["X1", "X2", " X1", "Boston"] {
            for record in user_filter(&data, Some(id), FIELD) {
                let value = record.field_text(FIELD).unwrap();
                assert_eq!(value.trim(), id.trim());
            }
        }
    }

    // -------------------------------------------------------------------------
    // Search
    // -------------------------------------------------------------------------

    #[test]
    fn test_search_empty_term_returns_scope() {
        let data = customers();
        let scope: Vec<&Record> = data.iter().collect();
        assert_eq!(search(scope.clone(), ""), scope);
    }

    #[test]
    fn test_search_is_case_insensitive_across_fields() {
        let data = customers();
        assert_eq!(names(&search(&data, "BOSTON")), vec!["Acme Corp", "Cedar Inc"]);
        assert_eq!(names(&search(&data, "ltd")), vec!["Birch Ltd"]);
    }

    #[test]
    fn test_search_matches_stringified_numbers() {
        let data = customers();
        assert_eq!(names(&search(&data, "120")), vec!["Acme Corp"]);
        // A null field stringifies to "null"
        assert_eq!(names(&search(&data, "nul")), vec!["Cedar Inc"]);
    }

    #[test]
    fn test_search_does_not_trim_term() {
        let data = customers();
        assert!(search(&data, " acme").is_empty());
    }

    #[test]
    fn test_search_is_idempotent() {
        let data = customers();
        for term in ["", "o", "X1", "zzz", "Denver"] {
            let once = search(&data, term);
            let twice = search(once.clone(), term);
            assert_eq!(once, twice);
        }
    }

    #[test]
    fn test_search_within_user_scope() {
        let data = customers();
        let scope = user_filter(&data, Some("X1"), FIELD);
        assert_eq!(names(&search(scope, "cedar")), vec!["Cedar Inc"]);
    }
}
