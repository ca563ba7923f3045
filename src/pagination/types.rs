//! Pagination types and traits
//!
//! Defines the fetch plan handed to a source, the raw page a source hands
//! back, and the two source traits the sequencers drive.

use crate::cursor::{CompositeCursor, CursorToken};
use crate::error::Result;
use crate::types::JsonObject;
use async_trait::async_trait;

/// What to fetch next
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchPlan<T> {
    /// Position to fetch from; `None` is the start of the collection
    pub position: Option<T>,
    /// Maximum number of records to request
    pub limit: usize,
}

impl<T> FetchPlan<T> {
    /// Create a new fetch plan
    pub fn new(position: Option<T>, limit: usize) -> Self {
        Self { position, limit }
    }

    /// Plan for the start of a collection
    pub fn start(limit: usize) -> Self {
        Self::new(None, limit)
    }
}

impl FetchPlan<i64> {
    /// Numeric offset; the start of the collection is offset 0
    pub fn offset(&self) -> i64 {
        self.position.unwrap_or(0)
    }
}

/// One page of a remote collection as returned by a source
#[derive(Debug, Clone, PartialEq)]
pub struct RawPage<T> {
    /// Records on this page
    pub objects: Vec<JsonObject>,
    /// Continuation token reported by the vendor, if any
    pub next_token: Option<T>,
    /// Explicit "more results" flag reported by the vendor, if any
    pub has_more: Option<bool>,
}

impl<T> RawPage<T> {
    /// Page without any continuation signal
    pub fn new(objects: Vec<JsonObject>) -> Self {
        Self {
            objects,
            next_token: None,
            has_more: None,
        }
    }

    /// Empty page
    pub fn empty() -> Self {
        Self::new(Vec::new())
    }

    /// Set the vendor continuation token
    #[must_use]
    pub fn with_next_token(mut self, token: Option<T>) -> Self {
        self.next_token = token;
        self
    }

    /// Set the vendor "more results" flag
    #[must_use]
    pub fn with_has_more(mut self, has_more: bool) -> Self {
        self.has_more = Some(has_more);
        self
    }
}

impl<T: CursorToken> RawPage<T> {
    /// Whether the collection has no records after this page
    ///
    /// An explicit `has_more == false` or an empty page always ends the
    /// listing. Token collections end when the vendor stops handing out
    /// tokens. Offset collections without a more flag end on a short page.
    pub fn is_exhausted(&self, limit: usize) -> bool {
        if self.has_more == Some(false) || self.objects.is_empty() {
            return true;
        }
        if T::VENDOR_DRIVEN {
            return !self
                .next_token
                .as_ref()
                .is_some_and(CursorToken::is_valid_position);
        }
        self.has_more.is_none() && self.objects.len() < limit
    }
}

/// Records for the caller plus the cursor for the following request
#[derive(Debug, Clone, PartialEq)]
pub struct SequencedPage<T> {
    /// Records fetched by this request
    pub objects: Vec<JsonObject>,
    /// Cursor for the next request; `None` once the full sync is complete
    pub next_cursor: Option<CompositeCursor<T>>,
}

impl<T> SequencedPage<T> {
    /// Terminal empty page
    pub fn complete() -> Self {
        Self {
            objects: Vec::new(),
            next_cursor: None,
        }
    }

    /// Whether this page ends the sync
    pub fn is_last(&self) -> bool {
        self.next_cursor.is_none()
    }
}

/// A single remote collection
#[async_trait]
pub trait FlatSource: Send + Sync {
    /// Cursor position type of this collection
    type Token: CursorToken;

    /// Fetch one page as described by `plan`
    async fn fetch_page(&self, plan: &FetchPlan<Self::Token>) -> Result<RawPage<Self::Token>>;
}

/// A two-level collection: an outer listing and, per outer item, an inner listing
#[async_trait]
pub trait NestedSource: Send + Sync {
    /// Cursor position type for both levels
    type Token: CursorToken;

    /// Fetch outer items; the sequencer always asks for exactly one
    async fn fetch_outer(&self, plan: &FetchPlan<Self::Token>) -> Result<RawPage<Self::Token>>;

    /// Fetch one page of the inner collection belonging to `collection_id`
    async fn fetch_inner(
        &self,
        collection_id: &str,
        plan: &FetchPlan<Self::Token>,
    ) -> Result<RawPage<Self::Token>>;
}
