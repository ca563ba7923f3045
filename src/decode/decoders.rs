//! Record extraction from vendor responses

use super::fields::lookup_value;
use crate::error::{Error, Result};
use crate::types::{json_type_name, JsonObject, JsonValue};

/// JSON decoder with optional record path extraction
#[derive(Debug, Clone, Default)]
pub struct JsonDecoder {
    /// Dotted path to the record array
    record_path: Option<String>,
}

impl JsonDecoder {
    /// Create a decoder that treats the whole body as the record array
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a decoder that reads records from `path`
    pub fn with_path(path: impl Into<String>) -> Self {
        Self {
            record_path: Some(path.into()),
        }
    }

    /// Extract records from an already parsed body
    ///
    /// A missing or null record path is an empty page. Anything else that is
    /// not an array of objects is a data shape error.
    pub fn extract_records(&self, value: &JsonValue) -> Result<Vec<JsonObject>> {
        let field = self.record_path.as_deref().unwrap_or("$");
        let records = match self.record_path.as_deref() {
            Some(path) => lookup_value(value, path),
            None => Some(value),
        };

        match records {
            None | Some(JsonValue::Null) => Ok(Vec::new()),
            Some(JsonValue::Array(items)) => items
                .iter()
                .enumerate()
                .map(|(i, item)| match item {
                    JsonValue::Object(map) => Ok(map.clone()),
                    other => Err(Error::data_shape(
                        format!("{field}[{i}]"),
                        "object",
                        json_type_name(other),
                    )),
                })
                .collect(),
            Some(other) => Err(Error::data_shape(field, "array", json_type_name(other))),
        }
    }
}
