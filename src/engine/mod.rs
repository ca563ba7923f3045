//! Execution engine module
//!
//! Serves the page protocol on top of the cursor and pagination modules.
//!
//! # Overview
//!
//! The engine module provides:
//! - `PageHandler` - entity registry, page size checks, timeout and cancellation
//! - `EntityPager` - one entity end to end (`FlatEntity`, `NestedEntity`)
//! - `PageRequest` / `Page` - the request and response of one page

mod handler;
mod pager;
mod types;

pub use handler::PageHandler;
pub use pager::{EntityPager, FlatEntity, NestedEntity};
pub use types::{HandlerConfig, Page, PageRequest, DEFAULT_MAX_PAGE_SIZE, DEFAULT_TIMEOUT};
