//! Common types used throughout connector-paging
//!
//! Shared type aliases and small enums used across modules.

use serde::{Deserialize, Serialize};
use std::fmt;

// ============================================================================
// Type Aliases
// ============================================================================

/// JSON value type (re-exported from serde_json)
pub type JsonValue = serde_json::Value;

/// JSON object type; raw vendor records are carried as these
pub type JsonObject = serde_json::Map<String, JsonValue>;

// ============================================================================
// Pagination Mode
// ============================================================================

/// How an entity's remote collection is paged
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaginationMode {
    /// Numeric offset + limit; cursors carry `i64` positions
    #[default]
    Offset,
    /// Vendor-issued continuation token; cursors carry strings
    Token,
}

impl fmt::Display for PaginationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Offset => write!(f, "offset"),
            Self::Token => write!(f, "token"),
        }
    }
}

/// Name of the JSON type of a value, for diagnostics
pub fn json_type_name(value: &JsonValue) -> &'static str {
    match value {
        JsonValue::Null => "null",
        JsonValue::Bool(_) => "bool",
        JsonValue::Number(n) if n.is_i64() || n.is_u64() => "integer",
        JsonValue::Number(_) => "float",
        JsonValue::String(_) => "string",
        JsonValue::Array(_) => "array",
        JsonValue::Object(_) => "object",
    }
}
