//! # Raw Records
//!
//! The shapes the record stores hand back to the read path. Threads come
//! back strongly typed; comments and replies come back as loosely-typed
//! field maps because their integrity is checked when they are turned into
//! views (see [`crate::views`]).

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Field keys shared by comment and reply records.
pub mod fields {
    pub const ID: &str = "id";
    pub const USERNAME: &str = "username";
    /// Creation timestamp. Named after the persistence column.
    pub const DATE: &str = "date";
    pub const CONTENT: &str = "content";
    /// Soft-delete flag. Named after the persistence column.
    pub const IS_DELETE: &str = "is_delete";
}

/// A thread as stored. Threads carry no redaction policy, so the store is
/// trusted to return well-formed values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThreadRecord {
    pub id: String,
    pub title: String,
    pub body: String,
    pub date: DateTime<Utc>,
    pub username: String,
}

/// The value of a single field in a [`RawRecord`].
///
/// Deserialises untagged from JSON. `Timestamp` is never produced by JSON
/// input; it is how adapters pass through native date values from a driver.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Null,
    Bool(bool),
    Integer(i64),
    Float(f64),
    Text(String),
    Timestamp(DateTime<Utc>),
    List(Vec<FieldValue>),
    Map(BTreeMap<String, FieldValue>),
}

impl FieldValue {
    /// Short name of the value's type, used in diagnostics.
    pub fn type_name(&self) -> &'static str {
        match self {
            FieldValue::Null => "null",
            FieldValue::Bool(_) => "boolean",
            FieldValue::Integer(_) => "integer",
            FieldValue::Float(_) => "float",
            FieldValue::Text(_) => "string",
            FieldValue::Timestamp(_) => "timestamp",
            FieldValue::List(_) => "list",
            FieldValue::Map(_) => "map",
        }
    }

    /// Null and the empty string count as "not provided".
    pub fn is_blank(&self) -> bool {
        match self {
            FieldValue::Null => true,
            FieldValue::Text(s) => s.is_empty(),
            _ => false,
        }
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Text(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::Text(value)
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        FieldValue::Bool(value)
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        FieldValue::Integer(value)
    }
}

impl From<f64> for FieldValue {
    fn from(value: f64) -> Self {
        FieldValue::Float(value)
    }
}

impl From<DateTime<Utc>> for FieldValue {
    fn from(value: DateTime<Utc>) -> Self {
        FieldValue::Timestamp(value)
    }
}

/// A comment or reply row exactly as the store produced it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RawRecord(BTreeMap<String, FieldValue>);

impl RawRecord {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, field: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        self.insert(field, value);
        self
    }

    pub fn insert(&mut self, field: impl Into<String>, value: impl Into<FieldValue>) {
        self.0.insert(field.into(), value.into());
    }

    pub fn get(&self, field: &str) -> Option<&FieldValue> {
        self.0.get(field)
    }

    pub fn remove(&mut self, field: &str) -> Option<FieldValue> {
        self.0.remove(field)
    }

    /// Looks up the record's `id` when it is a plain string.
    pub fn id(&self) -> Option<&str> {
        match self.get(fields::ID) {
            Some(FieldValue::Text(id)) => Some(id),
            _ => None,
        }
    }

    /// Parses a JSON object into a record. Anything but an object is rejected.
    pub fn from_json(value: serde_json::Value) -> serde_json::Result<Self> {
        match value {
            serde_json::Value::Object(_) => serde_json::from_value(value),
            other => Err(serde::de::Error::custom(format!(
                "expected a JSON object for a record, found {other}"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn from_json_keeps_field_types() {
        let record = RawRecord::from_json(json!({
            "id": "comment-1",
            "username": "dicoding",
            "date": "2021-08-08T07:22:33.555Z",
            "content": "hello",
            "is_delete": false,
            "likes": 3,
            "extra": null,
        }))
        .unwrap();

        assert_eq!(record.id(), Some("comment-1"));
        assert_eq!(record.get(fields::IS_DELETE), Some(&FieldValue::Bool(false)));
        assert_eq!(record.get("likes"), Some(&FieldValue::Integer(3)));
        assert_eq!(record.get("extra"), Some(&FieldValue::Null));
        assert!(record.get("missing").is_none());
    }

    #[test]
    fn from_json_rejects_non_objects() {
        assert!(RawRecord::from_json(json!(["comment-1"])).is_err());
        assert!(RawRecord::from_json(json!("comment-1")).is_err());
    }

    #[test]
    fn numeric_id_is_not_a_string_id() {
        let record = RawRecord::new().with(fields::ID, 123_i64);
        assert_eq!(record.id(), None);
    }

    #[test]
    fn blank_values() {
        assert!(FieldValue::Null.is_blank());
        assert!(FieldValue::from("").is_blank());
        assert!(!FieldValue::from(0_i64).is_blank());
        assert!(!FieldValue::from(false).is_blank());
    }
}
