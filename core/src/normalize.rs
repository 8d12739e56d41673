//! Reconciles backend primary-key names with the canonical string `id`.
//!
//! The backend names its keys per resource (`idClient`, `idDish`, ...) and
//! may send them as numbers. The rule: when the resource key is present,
//! non-null and non-empty, its string form becomes `id`; otherwise an existing
//! `id` is kept (stringified if needed). Every other field passes through
//! untouched, including the backend key itself.

use serde_json::{Map, Value};

use crate::error::ApiError;

/// String form of a scalar id value. Null and empty strings yield `None`.
fn id_string(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) if s.is_empty() => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

/// Resolves the canonical id of a raw record without modifying it.
pub fn canonical_id(key: &str, record: &Map<String, Value>) -> Option<String> {
    record
        .get(key)
        .and_then(id_string)
        .or_else(|| record.get("id").and_then(id_string))
}

/// Normalizes a single raw record. Fails if `value` is not a JSON object.
pub fn normalize_record(key: &str, value: Value) -> Result<Value, ApiError> {
    let mut record = match value {
        Value::Object(record) => record,
        other => {
            return Err(ApiError::DataShape(format!(
                "expected a JSON object, got {}",
                kind_of(&other)
            )))
        }
    };
    match canonical_id(key, &record) {
        Some(id) => {
            record.insert("id".to_string(), Value::String(id));
        }
        None => {
            record.remove("id");
        }
    }
    Ok(Value::Object(record))
}

/// Normalizes every element of a list payload, preserving server order.
/// Fails fast if `value` is not an array.
pub fn normalize_collection(key: &str, value: Value) -> Result<Vec<Value>, ApiError> {
    let items = match value {
        Value::Array(items) => items,
        other => {
            return Err(ApiError::DataShape(format!(
                "expected a JSON array, got {}",
                kind_of(&other)
            )))
        }
    };
    items
        .into_iter()
        .map(|item| normalize_record(key, item))
        .collect()
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
