//! Field coercion for decoded model output.
//!
//! Every field read from model JSON goes through one of these accessors, so
//! defaults and coercion rules live in one place:
//!
//! | accessor        | absent / wrong type | kept items                  |
//! |-----------------|---------------------|-----------------------------|
//! | `text`          | `""`                | trimmed string              |
//! | `list`          | `[]`                | any value                   |
//! | `string_list`   | `[]`                | non-empty trimmed strings   |
//! | `objects`       | `[]`                | JSON objects only           |

use serde_json::{Map, Value};

/// Read-only view over a decoded JSON object.
#[derive(Debug, Clone, Copy)]
pub struct Fields<'a> {
    map: &'a Map<String, Value>,
}

impl<'a> Fields<'a> {
    pub fn new(map: &'a Map<String, Value>) -> Self {
        Self { map }
    }

    /// View a value if it is an object.
    pub fn of(value: &'a Value) -> Option<Self> {
        value.as_object().map(Self::new)
    }

    /// Trimmed string field, empty when absent or not a string.
    pub fn text(&self, key: &str) -> String {
        self.map
            .get(key)
            .and_then(Value::as_str)
            .map(|s| s.trim().to_string())
            .unwrap_or_default()
    }

    /// List field, empty when absent or not a list.
    pub fn list(&self, key: &str) -> &'a [Value] {
        self.map
            .get(key)
            .and_then(Value::as_array)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Non-empty strings from a list field; other items are discarded.
    pub fn string_list(&self, key: &str) -> Vec<String> {
        self.list(key)
            .iter()
            .filter_map(Value::as_str)
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect()
    }

    /// Object items of a list field; other items are discarded.
    pub fn objects(&self, key: &str) -> impl Iterator<Item = Fields<'a>> + 'a {
        self.list(key).iter().filter_map(Fields::of)
    }

    /// Nested object field.
    pub fn object(&self, key: &str) -> Option<&'a Map<String, Value>> {
        self.map.get(key).and_then(Value::as_object)
    }
}

/// Flatten any JSON value into display text.
///
/// Lists become one string with `- ` bullet markers; nested values are
/// stringified.
pub fn flatten_to_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.trim().to_string(),
        Value::Null => String::new(),
        Value::Array(items) => items
            .iter()
            .map(flatten_to_text)
            .filter(|s| !s.is_empty())
            .map(|s| format!("- {}", s))
            .collect::<Vec<_>>()
            .join("\n"),
        other => other.to_string(),
    }
}
