//! Structural validation of decoded cursors

use super::codec::{COLLECTION_CURSOR_FIELD, COLLECTION_ID_FIELD, CURSOR_FIELD};
use super::types::{CompositeCursor, CursorToken};
use crate::error::{Error, Result};

/// Check a decoded cursor against the nesting capability of `entity_id`
///
/// Positions must be strictly positive; "start of sync" is the absent cursor,
/// never an explicit zero. Flat entities must not carry collection fields.
pub fn validate<T: CursorToken>(
    cursor: &CompositeCursor<T>,
    entity_id: &str,
    allows_nesting: bool,
) -> Result<()> {
    if let Some(position) = &cursor.cursor {
        if !position.is_valid_position() {
            return Err(Error::invalid_cursor(
                entity_id,
                CURSOR_FIELD,
                "cursor must be greater than 0",
            ));
        }
    }

    if !allows_nesting {
        let field = if cursor.collection_id.is_some() {
            Some(COLLECTION_ID_FIELD)
        } else if cursor.collection_cursor.is_some() {
            Some(COLLECTION_CURSOR_FIELD)
        } else {
            None
        };
        if let Some(field) = field {
            return Err(Error::invalid_cursor(
                entity_id,
                field,
                format!("nested pagination fields are not supported for entity {entity_id}"),
            ));
        }
        return Ok(());
    }

    if let Some(position) = &cursor.collection_cursor {
        if !position.is_valid_position() {
            return Err(Error::invalid_cursor(
                entity_id,
                COLLECTION_CURSOR_FIELD,
                "collection cursor must be greater than 0",
            ));
        }
    }

    Ok(())
}
