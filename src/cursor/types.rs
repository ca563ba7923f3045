//! Cursor types and the token trait
//!
//! A `CompositeCursor` is the whole of the traversal state. It is rebuilt
//! after every page and never modified in place.

use crate::error::{Error, Result};
use crate::types::{json_type_name, JsonValue};
use std::fmt;

/// Primitive type carried by a cursor position
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenType {
    /// 64-bit signed offset
    Int64,
    /// Opaque vendor string token
    String,
}

impl fmt::Display for TokenType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int64 => write!(f, "int64"),
            Self::String => write!(f, "string"),
        }
    }
}

/// A value usable as a cursor position
///
/// Implemented for `i64` (offset pagination) and `String` (token pagination).
pub trait CursorToken: Clone + fmt::Debug + PartialEq + Send + Sync + 'static {
    /// The primitive type tag, used in type mismatch errors
    const TOKEN_TYPE: TokenType;

    /// Whether the listing ends when the vendor hands back no continuation token
    const VENDOR_DRIVEN: bool;

    /// Read a decoded cursor field, rejecting values of the wrong JSON type
    fn from_json(field: &str, value: &JsonValue) -> Result<Self>;

    /// JSON representation inside an encoded cursor
    fn to_json(&self) -> JsonValue;

    /// Whether this is a usable resume position (strictly positive / non-empty)
    fn is_valid_position(&self) -> bool;

    /// Position following a page of `returned` records read at `start`
    fn advance(start: Option<&Self>, returned: usize, vendor_next: Option<Self>) -> Result<Option<Self>>;

    /// Query-string value to send for `position`, if any
    fn query_value(position: Option<&Self>) -> Option<String>;

    /// Parse a continuation token as reported by the vendor
    fn from_vendor_token(field: &str, raw: &str) -> Result<Self>;
}

impl CursorToken for i64 {
    const TOKEN_TYPE: TokenType = TokenType::Int64;
    const VENDOR_DRIVEN: bool = false;

    fn from_json(field: &str, value: &JsonValue) -> Result<Self> {
        match value {
            JsonValue::Number(n) => n.as_i64().ok_or_else(|| {
                let actual = if n.is_u64() {
                    "integer (out of int64 range)"
                } else {
                    "float"
                };
                Error::type_mismatch(field, TokenType::Int64.to_string(), actual)
            }),
            other => Err(Error::type_mismatch(
                field,
                TokenType::Int64.to_string(),
                json_type_name(other),
            )),
        }
    }

    fn to_json(&self) -> JsonValue {
        JsonValue::from(*self)
    }

    fn is_valid_position(&self) -> bool {
        *self > 0
    }

    fn advance(start: Option<&Self>, returned: usize, _vendor_next: Option<Self>) -> Result<Option<Self>> {
        let returned = i64::try_from(returned)
            .map_err(|_| Error::Other(format!("page of {returned} records overflows offset")))?;
        start
            .copied()
            .unwrap_or(0)
            .checked_add(returned)
            .map(Some)
            .ok_or_else(|| Error::Other("offset overflow while advancing cursor".to_string()))
    }

    fn query_value(position: Option<&Self>) -> Option<String> {
        Some(position.copied().unwrap_or(0).to_string())
    }

    fn from_vendor_token(field: &str, raw: &str) -> Result<Self> {
        raw.trim()
            .parse()
            .map_err(|_| Error::data_shape(field, "int64", format!("string '{raw}'")))
    }
}

impl CursorToken for String {
    const TOKEN_TYPE: TokenType = TokenType::String;
    const VENDOR_DRIVEN: bool = true;

    fn from_json(field: &str, value: &JsonValue) -> Result<Self> {
        match value {
            JsonValue::String(s) => Ok(s.clone()),
            other => Err(Error::type_mismatch(
                field,
                TokenType::String.to_string(),
                json_type_name(other),
            )),
        }
    }

    fn to_json(&self) -> JsonValue {
        JsonValue::String(self.clone())
    }

    fn is_valid_position(&self) -> bool {
        !self.is_empty()
    }

    fn advance(_start: Option<&Self>, _returned: usize, vendor_next: Option<Self>) -> Result<Option<Self>> {
        Ok(vendor_next.filter(|token| !token.is_empty()))
    }

    fn query_value(position: Option<&Self>) -> Option<String> {
        position.cloned()
    }

    fn from_vendor_token(_field: &str, raw: &str) -> Result<Self> {
        Ok(raw.to_string())
    }
}

/// Pagination state exchanged with the caller
///
/// - `cursor`: position within the level currently being iterated
/// - `collection_id`: outer item whose inner collection is being drained
/// - `collection_cursor`: saved position for resuming the outer collection
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompositeCursor<T> {
    pub cursor: Option<T>,
    pub collection_id: Option<String>,
    pub collection_cursor: Option<T>,
}

impl<T> Default for CompositeCursor<T> {
    fn default() -> Self {
        Self {
            cursor: None,
            collection_id: None,
            collection_cursor: None,
        }
    }
}

impl<T> CompositeCursor<T> {
    /// Create an empty cursor
    pub fn new() -> Self {
        Self::default()
    }

    /// Cursor with only a primary position
    pub fn at(cursor: T) -> Self {
        Self {
            cursor: Some(cursor),
            ..Self::default()
        }
    }

    /// Cursor positioned inside the inner collection of `collection_id`
    pub fn nested(
        cursor: Option<T>,
        collection_id: impl Into<String>,
        collection_cursor: Option<T>,
    ) -> Self {
        Self {
            cursor,
            collection_id: Some(collection_id.into()),
            collection_cursor,
        }
    }

    /// True if no field is set
    pub fn is_empty(&self) -> bool {
        self.cursor.is_none() && self.collection_id.is_none() && self.collection_cursor.is_none()
    }

    /// True if any nested-pagination field is set
    pub fn has_collection_fields(&self) -> bool {
        self.collection_id.is_some() || self.collection_cursor.is_some()
    }
}
