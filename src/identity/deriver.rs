//! Synthetic identifiers for records that have no natural one
//!
//! The ID is the configured field values joined by the delimiter, absent
//! fields contributing an empty string. Downstream systems persist these IDs
//! for deduplication, so the field list and delimiter of an entity must stay
//! fixed once records have been emitted.

use crate::decode::scalar_string;
use crate::error::{Error, Result};
use crate::types::{JsonObject, JsonValue};

/// Default attribute the derived ID is written to
pub const DEFAULT_TARGET: &str = "id";

/// Default field delimiter
pub const DEFAULT_DELIMITER: &str = "|";

const ESCAPE: char = '\\';

/// Derives a stable ID from an ordered list of record fields
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdentityDeriver {
    entity_kind: String,
    fields: Vec<String>,
    delimiter: String,
    target: String,
}

impl IdentityDeriver {
    /// Create a deriver for `entity_kind` over `fields`, in order
    pub fn new(
        entity_kind: impl Into<String>,
        fields: impl IntoIterator<Item = impl Into<String>>,
        delimiter: impl Into<String>,
    ) -> Result<Self> {
        let entity_kind = entity_kind.into();
        let fields: Vec<String> = fields.into_iter().map(Into::into).collect();
        let delimiter = delimiter.into();

        if fields.is_empty() {
            return Err(Error::config(format!(
                "Identity for '{entity_kind}' needs at least one field"
            )));
        }
        if delimiter.is_empty() || delimiter.contains(ESCAPE) {
            return Err(Error::config(format!(
                "Identity delimiter for '{entity_kind}' must be non-empty and must not contain '{ESCAPE}'"
            )));
        }

        Ok(Self {
            entity_kind,
            fields,
            delimiter,
            target: DEFAULT_TARGET.to_string(),
        })
    }

    /// Write the derived ID to `target` instead of `id`
    #[must_use]
    pub fn with_target(mut self, target: impl Into<String>) -> Self {
        self.target = target.into();
        self
    }

    /// Entity kind this deriver belongs to
    pub fn entity_kind(&self) -> &str {
        &self.entity_kind
    }

    /// Ordered source fields
    pub fn fields(&self) -> &[String] {
        &self.fields
    }

    /// Attribute the ID is written to
    pub fn target(&self) -> &str {
        &self.target
    }

    /// Join already extracted field values
    ///
    /// `values` must line up with the configured fields. Delimiter characters
    /// and backslashes inside a value are backslash-escaped so distinct tuples
    /// never join to the same string.
    pub fn derive_values(&self, values: &[Option<&str>]) -> Result<String> {
        if values.len() != self.fields.len() {
            return Err(Error::config(format!(
                "Identity for '{}' expects {} values, got {}",
                self.entity_kind,
                self.fields.len(),
                values.len()
            )));
        }

        let mut id = String::new();
        for (i, value) in values.iter().enumerate() {
            if i > 0 {
                id.push_str(&self.delimiter);
            }
            self.push_escaped(&mut id, value.unwrap_or_default());
        }
        Ok(id)
    }

    /// Derive the ID of a raw record
    pub fn derive(&self, record: &JsonObject) -> Result<String> {
        let values = self
            .fields
            .iter()
            .map(|field| scalar_string(record, field))
            .collect::<Result<Vec<_>>>()?;
        let values: Vec<Option<&str>> = values.iter().map(Option::as_deref).collect();
        self.derive_values(&values)
    }

    /// Derive the ID and store it on the record
    pub fn apply(&self, record: &mut JsonObject) -> Result<()> {
        let id = self.derive(record)?;
        record.insert(self.target.clone(), JsonValue::String(id));
        Ok(())
    }

    /// Derive and store IDs on every record
    pub fn apply_all(&self, records: &mut [JsonObject]) -> Result<()> {
        records.iter_mut().try_for_each(|record| self.apply(record))
    }

    fn push_escaped(&self, out: &mut String, value: &str) {
        for c in value.chars() {
            if c == ESCAPE || self.delimiter.contains(c) {
                out.push(ESCAPE);
            }
            out.push(c);
        }
    }
}
