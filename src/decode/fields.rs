//! Typed field access on dynamic vendor JSON
//!
//! Every accessor is fallible: a missing or mistyped field becomes
//! `Error::UpstreamDataShape` naming the field, the expected type and the
//! type actually found.

use crate::error::{Error, Result};
use crate::types::{json_type_name, JsonObject, JsonValue};

/// Resolve a dotted path (`$.a.b`, `a.b`, `items[0].id`) inside a JSON object
pub fn lookup<'a>(object: &'a JsonObject, path: &str) -> Option<&'a JsonValue> {
    let path = path.strip_prefix("$.").unwrap_or(path);
    let mut parts = path.split('.');
    let mut current = segment(object, parts.next()?)?;
    for part in parts {
        current = segment(current.as_object()?, part)?;
    }
    Some(current)
}

/// Resolve a dotted path inside any JSON value; `$` or `""` is the value itself
pub fn lookup_value<'a>(value: &'a JsonValue, path: &str) -> Option<&'a JsonValue> {
    let path = path.strip_prefix("$.").unwrap_or(path);
    if path.is_empty() || path == "$" {
        return Some(value);
    }
    lookup(value.as_object()?, path)
}

fn segment<'a>(object: &'a JsonObject, part: &str) -> Option<&'a JsonValue> {
    let Some(bracket_pos) = part.find('[') else {
        return object.get(part);
    };
    let index = part[bracket_pos + 1..]
        .strip_suffix(']')
        .and_then(|s| s.parse::<usize>().ok())?;
    object.get(&part[..bracket_pos])?.as_array()?.get(index)
}

/// Optional boolean field; null and missing are both `None`
pub fn optional_bool(object: &JsonObject, field: &str) -> Result<Option<bool>> {
    match lookup(object, field) {
        None | Some(JsonValue::Null) => Ok(None),
        Some(JsonValue::Bool(b)) => Ok(Some(*b)),
        Some(other) => Err(Error::data_shape(field, "bool", json_type_name(other))),
    }
}

/// Required identifier: a string, or an integer rendered as a string
pub fn require_id(object: &JsonObject, field: &str) -> Result<String> {
    match lookup(object, field) {
        Some(JsonValue::String(s)) if !s.is_empty() => Ok(s.clone()),
        Some(value @ JsonValue::Number(n)) if n.is_i64() || n.is_u64() => Ok(value.to_string()),
        Some(JsonValue::String(_)) => Err(Error::data_shape(field, "string or integer", "empty string")),
        Some(other) => Err(Error::data_shape(
            field,
            "string or integer",
            json_type_name(other),
        )),
        None => Err(Error::data_shape(field, "string or integer", "missing")),
    }
}

/// Render a scalar field as text; null and missing are `None`
pub fn scalar_string(object: &JsonObject, field: &str) -> Result<Option<String>> {
    match lookup(object, field) {
        None | Some(JsonValue::Null) => Ok(None),
        Some(JsonValue::String(s)) => Ok(Some(s.clone())),
        Some(value @ (JsonValue::Number(_) | JsonValue::Bool(_))) => Ok(Some(value.to_string())),
        Some(other) => Err(Error::data_shape(field, "scalar", json_type_name(other))),
    }
}
