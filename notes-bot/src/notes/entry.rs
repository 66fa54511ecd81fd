//! Saved-note records as they live in the data file.
//!
//! The file may contain anything that was ever written to it, so every
//! element is first classified as a [`StoredRecord`] and then resolved into
//! a uniform [`Entry`] for display.

use serde::Serialize;
use serde_json::{Map, Value};

/// Author used when a record carries no usable author.
pub const UNKNOWN_AUTHOR: &str = "unknown";

/// One saved note.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Entry {
    pub author: String,
    pub timestamp: Option<String>,
    pub payload: Value,
}

impl Entry {
    /// Build a fresh entry for a `!save` command. A blank author falls back to `unknown`.
    pub fn new(author: &str, timestamp: impl Into<String>, payload: &str) -> Self {
        let author = if author.is_empty() {
            UNKNOWN_AUTHOR.to_string()
        } else {
            author.to_string()
        };
        Self {
            author,
            timestamp: Some(timestamp.into()),
            payload: Value::String(payload.to_string()),
        }
    }

    /// JSON object in field order: author, timestamp, payload
    pub fn to_value(&self) -> Result<Value, String> {
        serde_json::to_value(self).map_err(|e| format!("Failed to serialize entry: {}", e))
    }
}

/// A raw element of the stored array.
#[derive(Debug, Clone, PartialEq)]
pub enum StoredRecord {
    /// An object with an `author` key, written by `!save`.
    Structured(Map<String, Value>),
    /// Anything else: bare strings, numbers, objects without `author`.
    Legacy(Value),
}

impl From<Value> for StoredRecord {
    fn from(value: Value) -> Self {
        match value {
            Value::Object(map) if map.contains_key("author") => StoredRecord::Structured(map),
            other => StoredRecord::Legacy(other),
        }
    }
}

impl StoredRecord {
    /// Turn the parsed file contents into records. A lone non-array value is
    /// treated as a one-element collection.
    pub fn collection_from(value: Value) -> Vec<StoredRecord> {
        match value {
            Value::Array(items) => items.into_iter().map(StoredRecord::from).collect(),
            other => vec![StoredRecord::from(other)],
        }
    }

    /// The value to write back to disk, unchanged from what was read.
    pub fn into_value(self) -> Value {
        match self {
            StoredRecord::Structured(map) => Value::Object(map),
            StoredRecord::Legacy(value) => value,
        }
    }

    pub fn into_entry(self) -> Entry {
        match self {
            StoredRecord::Legacy(value) => Entry {
                author: UNKNOWN_AUTHOR.to_string(),
                timestamp: None,
                payload: value,
            },
            StoredRecord::Structured(map) => {
                let author = author_key(map.get("author"));
                let timestamp = match map.get("timestamp") {
                    None | Some(Value::Null) => None,
                    Some(Value::String(s)) => Some(s.clone()),
                    Some(other) => Some(other.to_string()),
                };
                // An entry without a payload key shows the whole object
                let payload = match map.get("payload") {
                    Some(payload) => payload.clone(),
                    None => Value::Object(map.clone()),
                };
                Entry {
                    author,
                    timestamp,
                    payload,
                }
            }
        }
    }
}

/// Group key for an `author` value; falsy values collapse to `unknown`.
fn author_key(value: Option<&Value>) -> String {
    match value {
        Some(Value::String(s)) if !s.is_empty() => s.clone(),
        None | Some(Value::Null) | Some(Value::Bool(false)) | Some(Value::String(_)) => {
            UNKNOWN_AUTHOR.to_string()
        }
        Some(Value::Number(n)) if n.as_f64() == Some(0.0) => UNKNOWN_AUTHOR.to_string(),
        Some(Value::Array(a)) if a.is_empty() => UNKNOWN_AUTHOR.to_string(),
        Some(Value::Object(o)) if o.is_empty() => UNKNOWN_AUTHOR.to_string(),
        Some(other) => other.to_string(),
    }
}
