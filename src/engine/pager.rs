//! Entity pagers
//!
//! An entity pager runs one page request end to end: decode and validate the
//! cursor, sequence the fetch, stamp synthetic IDs, encode the next cursor.

use super::types::Page;
use crate::cursor::{decode_optional, encode_next, validate, CursorToken};
use crate::error::Result;
use crate::identity::IdentityDeriver;
use crate::pagination::{
    FlatSequencer, FlatSource, NestedSequencer, NestedSource, SequencedPage,
};
use async_trait::async_trait;

/// A registered entity
#[async_trait]
pub trait EntityPager: Send + Sync {
    /// Entity name used in page requests
    fn entity_id(&self) -> &str;

    /// Whether cursors of this entity may carry collection fields
    fn allows_nesting(&self) -> bool;

    /// Read the page following `cursor`
    async fn page(&self, cursor: &str, page_size: usize) -> Result<Page>;
}

fn finish<T: CursorToken>(
    mut page: SequencedPage<T>,
    identity: Option<&IdentityDeriver>,
) -> Result<Page> {
    if let Some(deriver) = identity {
        deriver.apply_all(&mut page.objects)?;
    }
    Ok(Page {
        next_cursor: encode_next(page.next_cursor.as_ref()),
        objects: page.objects,
    })
}

/// Entity backed by a single collection
pub struct FlatEntity<S> {
    entity_id: String,
    source: S,
    identity: Option<IdentityDeriver>,
}

impl<S: FlatSource> FlatEntity<S> {
    /// Create a flat entity
    pub fn new(entity_id: impl Into<String>, source: S) -> Self {
        Self {
            entity_id: entity_id.into(),
            source,
            identity: None,
        }
    }

    /// Derive synthetic IDs for every record
    #[must_use]
    pub fn with_identity(mut self, deriver: IdentityDeriver) -> Self {
        self.identity = Some(deriver);
        self
    }
}

#[async_trait]
impl<S: FlatSource> EntityPager for FlatEntity<S> {
    fn entity_id(&self) -> &str {
        &self.entity_id
    }

    fn allows_nesting(&self) -> bool {
        false
    }

    async fn page(&self, cursor: &str, page_size: usize) -> Result<Page> {
        let cursor = decode_optional::<S::Token>(cursor)?;
        if let Some(cursor) = &cursor {
            validate(cursor, &self.entity_id, false)?;
        }

        let page = FlatSequencer::new(&self.entity_id, page_size)
            .next_page(&self.source, cursor.as_ref())
            .await?;
        finish(page, self.identity.as_ref())
    }
}

/// Entity whose records are the inner items of every outer item
pub struct NestedEntity<S> {
    entity_id: String,
    source: S,
    outer_id_field: String,
    identity: Option<IdentityDeriver>,
}

impl<S: NestedSource> NestedEntity<S> {
    /// Create a nested entity; `outer_id_field` locates the outer item's id
    pub fn new(entity_id: impl Into<String>, source: S, outer_id_field: impl Into<String>) -> Self {
        Self {
            entity_id: entity_id.into(),
            source,
            outer_id_field: outer_id_field.into(),
            identity: None,
        }
    }

    /// Derive synthetic IDs for every record
    #[must_use]
    pub fn with_identity(mut self, deriver: IdentityDeriver) -> Self {
        self.identity = Some(deriver);
        self
    }
}

#[async_trait]
impl<S: NestedSource> EntityPager for NestedEntity<S> {
    fn entity_id(&self) -> &str {
        &self.entity_id
    }

    fn allows_nesting(&self) -> bool {
        true
    }

    async fn page(&self, cursor: &str, page_size: usize) -> Result<Page> {
        let cursor = decode_optional::<S::Token>(cursor)?;
        if let Some(cursor) = &cursor {
            validate(cursor, &self.entity_id, true)?;
        }

        let page = NestedSequencer::new(&self.entity_id, page_size, &self.outer_id_field)
            .next_page(&self.source, cursor.as_ref())
            .await?;
        finish(page, self.identity.as_ref())
    }
}
