//! Tolerant decoding of JSON embedded in free-form model output.
//!
//! Grammar: the response is trimmed, then the candidate is the span from the
//! first `{` through the last `}` (greedy outermost capture). If there is no
//! such span the whole trimmed response is the candidate. The candidate must
//! parse as JSON or decoding fails. Code fences and commentary around the
//! object are therefore ignored, but nothing inside the span is repaired.

use serde_json::{Map, Value};
use thiserror::Error;

/// Errors produced while decoding model output.
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("response is empty")]
    Empty,

    #[error("invalid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),

    #[error("expected a JSON object, found {0}")]
    NotAnObject(&'static str),
}

/// Locate the outermost `{ ... }` span, if any.
pub fn outermost_span(raw: &str) -> Option<&str> {
    let start = raw.find('{')?;
    let end = raw.rfind('}')?;
    if start < end {
        Some(&raw[start..=end])
    } else {
        None
    }
}

/// Decode the outermost brace span (or the whole text) as JSON.
pub fn decode_value(raw: &str) -> Result<Value, DecodeError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(DecodeError::Empty);
    }
    let candidate = outermost_span(trimmed).unwrap_or(trimmed);
    Ok(serde_json::from_str(candidate)?)
}

/// Decode and require a top-level object.
pub fn decode_object(raw: &str) -> Result<Map<String, Value>, DecodeError> {
    match decode_value(raw)? {
        Value::Object(map) => Ok(map),
        other => Err(DecodeError::NotAnObject(kind_of(&other))),
    }
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
