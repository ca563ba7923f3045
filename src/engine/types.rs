//! Engine types
//!
//! The page protocol exchanged with the surrounding framework and the
//! handler configuration.

use crate::types::JsonObject;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Default per-request timeout
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Default upper bound on the requested page size
pub const DEFAULT_MAX_PAGE_SIZE: usize = 1000;

/// One page request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageRequest {
    /// Opaque cursor; empty on the first page
    #[serde(default)]
    pub cursor: String,
    /// Requested number of records
    pub page_size: usize,
    /// Entity to read
    pub entity: String,
}

impl PageRequest {
    /// Request for the first page of `entity`
    pub fn first(entity: impl Into<String>, page_size: usize) -> Self {
        Self {
            cursor: String::new(),
            page_size,
            entity: entity.into(),
        }
    }

    /// Request for the page following `page`
    #[must_use]
    pub fn after(&self, page: &Page) -> Self {
        Self {
            cursor: page.next_cursor.clone(),
            ..self.clone()
        }
    }
}

/// One page of results
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page {
    /// Records on this page
    pub objects: Vec<JsonObject>,
    /// Opaque cursor for the next request; empty once the sync is complete
    pub next_cursor: String,
}

impl Page {
    /// Whether this page completes the sync
    pub fn is_last(&self) -> bool {
        self.next_cursor.is_empty()
    }
}

/// Page handler configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HandlerConfig {
    /// Budget for a whole page request (all vendor calls it makes)
    pub timeout: Duration,
    /// Largest page size a caller may request
    pub max_page_size: usize,
}

impl Default for HandlerConfig {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
            max_page_size: DEFAULT_MAX_PAGE_SIZE,
        }
    }
}

impl HandlerConfig {
    /// Set the request timeout
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the maximum page size
    #[must_use]
    pub fn with_max_page_size(mut self, max_page_size: usize) -> Self {
        self.max_page_size = max_page_size;
        self
    }
}
