use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One row of the customer dataset.
///
/// Column order follows the source document, which matters because the
/// first record's keys become the table header.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Record(Map<String, Value>);

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert, mostly handy for constructing fixtures.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.0.insert(key.into(), value.into());
        self
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn values(&self) -> impl Iterator<Item = &Value> {
        self.0.values()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Text shown in a table cell. Missing and `null` values are blank.
    pub fn display_value(&self, key: &str) -> String {
        match self.0.get(key) {
            None | Some(Value::Null) => String::new(),
            Some(value) => value_text(value),
        }
    }

    /// Text of a field for identity matching, `None` when the field is
    /// missing or `null`.
    pub fn field_text(&self, key: &str) -> Option<String> {
        match self.0.get(key) {
            None | Some(Value::Null) => None,
            Some(value) => Some(value_text(value)),
        }
    }
}

impl From<Map<String, Value>> for Record {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

/// Stringify a JSON value the way it is searched and displayed.
///
/// Strings are used verbatim; everything else uses its compact JSON text,
/// so `null` becomes `"null"` and `12` becomes `"12"`.
pub fn value_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_record_preserves_key_order() {
        let record: Record =
            serde_json::from_value(json!({"Zeta": 1, "Alpha": 2, "Mid_Name": 3})).unwrap();
        let keys: Vec<&str> = record.keys().collect();
        assert_eq!(keys, vec!["Zeta", "Alpha", "Mid_Name"]);
    }

    #[test]
    fn test_display_value_blanks_missing_and_null() {
        let record = Record::new()
            .with("Name", "Ada")
            .with("Balance", 0)
            .with("Notes", Value::Null);

        assert_eq!(record.display_value("Name"), "Ada");
        assert_eq!(record.display_value("Balance"), "0");
        assert_eq!(record.display_value("Notes"), "");
        assert_eq!(record.display_value("Missing"), "");
    }

    #[test]
    fn test_field_text() {
        let record = Record::new().with("Code", 42).with("Empty", Value::Null);
        assert_eq!(record.field_text("Code").as_deref(), Some("42"));
        assert_eq!(record.field_text("Empty"), None);
        assert_eq!(record.field_text("Nope"), None);
    }

    #[test]
    fn test_value_text() {
        assert_eq!(value_text(&json!("plain")), "plain");
        assert_eq!(value_text(&json!(3.5)), "3.5");
        assert_eq!(value_text(&json!(true)), "true");
        assert_eq!(value_text(&Value::Null), "null");
        assert_eq!(value_text(&json!([1, 2])), "[1,2]");
    }

    #[test]
    fn test_non_object_is_rejected() {
        assert!(serde_json::from_value::<Record>(json!("just a string")).is_err());
        assert!(serde_json::from_value::<Record>(json!([1, 2, 3])).is_err());
    }
}
