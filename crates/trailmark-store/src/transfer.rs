//! Export and import of completion maps

use crate::error::ImportError;
use serde_json::Value;
use std::collections::BTreeMap;

/// Pretty JSON body for a progress export
///
/// # Errors
/// Serialization failure (not expected for string/bool maps).
pub fn export_json(map: &BTreeMap<String, bool>) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(map)
}

/// File name for a progress export
#[must_use]
pub fn export_file_name(prefix: &str, route_id: &str) -> String {
    format!("{prefix}-progress-{route_id}.json")
}

/// Parse a user-supplied progress file
///
/// The top level must be an object. Values are read as truthy/falsy:
/// `false`, `null`, `0` and `""` are incomplete, anything else complete.
///
/// # Errors
/// [`ImportError::Parse`] for malformed JSON, [`ImportError::NotAnObject`]
/// for any other top-level shape.
pub fn parse_import(text: &str) -> Result<BTreeMap<String, bool>, ImportError> {
    let value: Value = serde_json::from_str(text)?;
    coerce_map(value).ok_or(ImportError::NotAnObject)
}

/// Read a stored or imported JSON object as id → flag
pub(crate) fn coerce_map(value: Value) -> Option<BTreeMap<String, bool>> {
    match value {
        Value::Object(obj) => Some(obj.into_iter().map(|(k, v)| (k, truthy(&v))).collect()),
        _ => None,
    }
}

fn truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}
