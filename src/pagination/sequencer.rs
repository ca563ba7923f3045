//! Page sequencers
//!
//! Given the incoming cursor, a sequencer decides what to fetch, performs the
//! fetch through a source, and derives the cursor for the next request. All
//! state lives in the cursor, so sequencers are immutable and shareable.

use super::types::{FetchPlan, FlatSource, NestedSource, RawPage, SequencedPage};
use crate::cursor::{CompositeCursor, CursorToken};
use crate::decode::require_id;
use crate::error::{Error, Result};
use tracing::{debug, warn};

// ============================================================================
// Flat Traversal
// ============================================================================

/// Sequencer for a single remote collection
#[derive(Debug, Clone)]
pub struct FlatSequencer {
    entity_id: String,
    page_size: usize,
}

impl FlatSequencer {
    /// Create a flat sequencer for `entity_id`
    pub fn new(entity_id: impl Into<String>, page_size: usize) -> Self {
        Self {
            entity_id: entity_id.into(),
            page_size,
        }
    }

    /// Plan the fetch for an incoming cursor
    pub fn plan<T: CursorToken>(&self, cursor: Option<&CompositeCursor<T>>) -> FetchPlan<T> {
        FetchPlan::new(cursor.and_then(|c| c.cursor.clone()), self.page_size)
    }

    /// Derive the next cursor from the page fetched for `plan`
    pub fn advance<T: CursorToken>(
        &self,
        plan: &FetchPlan<T>,
        page: &RawPage<T>,
    ) -> Result<Option<CompositeCursor<T>>> {
        if page.is_exhausted(plan.limit) {
            return Ok(None);
        }
        let next = T::advance(
            plan.position.as_ref(),
            page.objects.len(),
            page.next_token.clone(),
        )?;
        Ok(next.map(CompositeCursor::at))
    }

    /// Fetch the page following `cursor`
    pub async fn next_page<S>(
        &self,
        source: &S,
        cursor: Option<&CompositeCursor<S::Token>>,
    ) -> Result<SequencedPage<S::Token>>
    where
        S: FlatSource + ?Sized,
    {
        let plan = self.plan(cursor);
        debug!(
            entity = %self.entity_id,
            position = ?plan.position,
            limit = plan.limit,
            "Fetching flat page"
        );

        let page = source.fetch_page(&plan).await?;
        let next_cursor = self.advance(&plan, &page)?;

        debug!(
            entity = %self.entity_id,
            returned = page.objects.len(),
            done = next_cursor.is_none(),
            "Flat page fetched"
        );

        Ok(SequencedPage {
            objects: page.objects,
            next_cursor,
        })
    }
}

// ============================================================================
// Nested Traversal
// ============================================================================

/// Where a nested traversal resumes
enum Resume<T> {
    /// Pick the outer item at this position, then read its first inner page
    SelectOuter { outer_position: Option<T> },
    /// Keep reading the inner collection of `collection_id`
    ContinueInner {
        collection_id: String,
        inner_position: T,
        saved_outer_next: Option<T>,
    },
}

/// Sequencer that flattens "inner items of every outer item" into one listing
///
/// Only one outer item is fetched per request, and a drained outer item is
/// never fetched again.
#[derive(Debug, Clone)]
pub struct NestedSequencer {
    entity_id: String,
    page_size: usize,
    outer_id_field: String,
}

impl NestedSequencer {
    /// Create a nested sequencer; `outer_id_field` names the outer item's id
    pub fn new(
        entity_id: impl Into<String>,
        page_size: usize,
        outer_id_field: impl Into<String>,
    ) -> Self {
        Self {
            entity_id: entity_id.into(),
            page_size,
            outer_id_field: outer_id_field.into(),
        }
    }

    fn resume<T: CursorToken>(&self, cursor: Option<&CompositeCursor<T>>) -> Result<Resume<T>> {
        let Some(cursor) = cursor else {
            return Ok(Resume::SelectOuter {
                outer_position: None,
            });
        };

        match (&cursor.cursor, &cursor.collection_id) {
            (Some(inner_position), Some(collection_id)) => Ok(Resume::ContinueInner {
                collection_id: collection_id.clone(),
                inner_position: inner_position.clone(),
                saved_outer_next: cursor.collection_cursor.clone(),
            }),
            (Some(_), None) => Err(Error::invalid_cursor(
                &self.entity_id,
                "collectionId",
                "collectionId is required while an inner cursor is set",
            )),
            (None, Some(_)) if cursor.collection_cursor.is_none() => Err(Error::invalid_cursor(
                &self.entity_id,
                "collectionCursor",
                "cursor has no inner or outer position left to resume from",
            )),
            (None, _) => Ok(Resume::SelectOuter {
                outer_position: cursor.collection_cursor.clone(),
            }),
        }
    }

    /// Fetch the page following `cursor`
    pub async fn next_page<S>(
        &self,
        source: &S,
        cursor: Option<&CompositeCursor<S::Token>>,
    ) -> Result<SequencedPage<S::Token>>
    where
        S: NestedSource + ?Sized,
    {
        let (collection_id, inner_position, saved_outer_next) = match self.resume(cursor)? {
            Resume::SelectOuter { outer_position } => {
                let plan = FetchPlan::new(outer_position, 1);
                debug!(
                    entity = %self.entity_id,
                    position = ?plan.position,
                    "Selecting next outer item"
                );

                let outer = source.fetch_outer(&plan).await?;
                let Some(item) = outer.objects.first() else {
                    debug!(entity = %self.entity_id, "Outer collection exhausted");
                    return Ok(SequencedPage::complete());
                };
                if outer.objects.len() > 1 {
                    warn!(
                        entity = %self.entity_id,
                        returned = outer.objects.len(),
                        "Outer fetch returned more than one item, using the first"
                    );
                }

                let collection_id = require_id(item, &self.outer_id_field)?;
                let saved_outer_next = if outer.is_exhausted(1) {
                    None
                } else {
                    <S::Token as CursorToken>::advance(
                        plan.position.as_ref(),
                        1,
                        outer.next_token.clone(),
                    )?
                };
                (collection_id, None, saved_outer_next)
            }
            Resume::ContinueInner {
                collection_id,
                inner_position,
                saved_outer_next,
            } => (collection_id, Some(inner_position), saved_outer_next),
        };

        let plan = FetchPlan::new(inner_position, self.page_size);
        debug!(
            entity = %self.entity_id,
            collection_id = %collection_id,
            position = ?plan.position,
            limit = plan.limit,
            "Fetching inner page"
        );

        let inner = source.fetch_inner(&collection_id, &plan).await?;

        let next_inner = if inner.is_exhausted(plan.limit) {
            None
        } else {
            <S::Token as CursorToken>::advance(
                plan.position.as_ref(),
                inner.objects.len(),
                inner.next_token.clone(),
            )?
        };

        let next_cursor = match (next_inner, saved_outer_next) {
            (Some(inner_next), outer_next) => Some(CompositeCursor::nested(
                Some(inner_next),
                collection_id,
                outer_next,
            )),
            (None, Some(outer_next)) => Some(CompositeCursor::nested(
                None,
                collection_id,
                Some(outer_next),
            )),
            (None, None) => None,
        };

        debug!(
            entity = %self.entity_id,
            returned = inner.objects.len(),
            done = next_cursor.is_none(),
            "Inner page fetched"
        );

        Ok(SequencedPage {
            objects: inner.objects,
            next_cursor,
        })
    }
}
