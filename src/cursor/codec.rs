//! Cursor encoding
//!
//! Wire format: standard base64 of a compact JSON object with the keys
//! `cursor`, `collectionId`, `collectionCursor`. Absent fields are omitted.

use super::types::{CompositeCursor, CursorToken};
use crate::error::{Error, Result};
use crate::types::{json_type_name, JsonObject, JsonValue};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;

pub(crate) const CURSOR_FIELD: &str = "cursor";
pub(crate) const COLLECTION_ID_FIELD: &str = "collectionId";
pub(crate) const COLLECTION_CURSOR_FIELD: &str = "collectionCursor";

/// Encode a cursor into an opaque token
pub fn encode<T: CursorToken>(cursor: &CompositeCursor<T>) -> String {
    let mut wire = JsonObject::new();
    if let Some(position) = &cursor.cursor {
        wire.insert(CURSOR_FIELD.to_string(), position.to_json());
    }
    if let Some(id) = &cursor.collection_id {
        wire.insert(COLLECTION_ID_FIELD.to_string(), JsonValue::String(id.clone()));
    }
    if let Some(position) = &cursor.collection_cursor {
        wire.insert(COLLECTION_CURSOR_FIELD.to_string(), position.to_json());
    }
    STANDARD.encode(JsonValue::Object(wire).to_string())
}

/// Encode the cursor for the next page; `None` (sync complete) becomes `""`
pub fn encode_next<T: CursorToken>(cursor: Option<&CompositeCursor<T>>) -> String {
    cursor.map(encode).unwrap_or_default()
}

/// Decode an opaque token into a cursor with `T` positions
pub fn decode<T: CursorToken>(token: &str) -> Result<CompositeCursor<T>> {
    let bytes = STANDARD
        .decode(token.trim())
        .map_err(|e| Error::malformed_cursor(format!("invalid base64 encoding: {e}")))?;

    let value: JsonValue = serde_json::from_slice(&bytes)
        .map_err(|e| Error::malformed_cursor(format!("invalid JSON payload: {e}")))?;

    let wire = match value {
        JsonValue::Object(map) => map,
        other => {
            return Err(Error::malformed_cursor(format!(
                "expected a JSON object, got {}",
                json_type_name(&other)
            )))
        }
    };

    let collection_id = match wire.get(COLLECTION_ID_FIELD) {
        None | Some(JsonValue::Null) => None,
        Some(JsonValue::String(id)) => Some(id.clone()),
        Some(other) => {
            return Err(Error::type_mismatch(
                COLLECTION_ID_FIELD,
                "string",
                json_type_name(other),
            ))
        }
    };

    Ok(CompositeCursor {
        cursor: position_field(&wire, CURSOR_FIELD)?,
        collection_id,
        collection_cursor: position_field(&wire, COLLECTION_CURSOR_FIELD)?,
    })
}

/// Decode a request token; the empty token means "first page"
pub fn decode_optional<T: CursorToken>(token: &str) -> Result<Option<CompositeCursor<T>>> {
    if token.trim().is_empty() {
        return Ok(None);
    }
    decode(token).map(Some)
}

fn position_field<T: CursorToken>(wire: &JsonObject, field: &str) -> Result<Option<T>> {
    match wire.get(field) {
        None | Some(JsonValue::Null) => Ok(None),
        Some(value) => T::from_json(field, value).map(Some),
    }
}
