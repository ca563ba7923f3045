// Allow common clippy pedantic lints that aren't critical for this codebase
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_lossless)]
#![allow(clippy::too_many_lines)]
#![allow(clippy::ref_option)]
#![allow(clippy::unused_self)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::items_after_statements)]
#![allow(clippy::unnecessary_wraps)]
#![allow(clippy::match_same_arms)]
#![allow(clippy::needless_pass_by_value)]
#![allow(clippy::unused_async)]

//! # connector-paging
//!
//! Stateless, resumable pagination for REST API connectors.
//!
//! Every page request carries an opaque cursor; the response carries the
//! cursor for the next request. All traversal state lives in that cursor,
//! so requests can be retried, resumed after a crash, or served by any
//! worker without shared state.
//!
//! ## Features
//!
//! - **Opaque Cursors**: base64 JSON with a stable, round-trippable encoding
//! - **Offset and Token Paging**: `i64` offsets or vendor continuation tokens
//! - **Nested Collections**: "inner items of every outer item" as one listing
//! - **Synthetic IDs**: deterministic IDs for records without a natural key
//! - **YAML Adapters**: declarative entity definitions over a generic HTTP client
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use connector_paging::{build_handler, load_adapter, PageRequest, Result};
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let handler = build_handler(&load_adapter("adapters/directory.yaml")?)?;
//!
//!     let mut request = PageRequest::first("Group", 100);
//!     loop {
//!         let page = handler.handle(&request).await?;
//!         // Process page.objects
//!         if page.is_last() {
//!             break;
//!         }
//!         request = request.after(&page);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │      PageHandler: PageRequest → Page (timeout, cancel)      │
//! └─────────────────────────────────────────────────────────────┘
//!                               │
//! ┌─────────────┬───────────────┴──────┬────────────┬───────────┐
//! │   Cursor    │      Pagination      │  Identity  │   HTTP    │
//! ├─────────────┼──────────────────────┼────────────┼───────────┤
//! │ encode      │ FlatSequencer        │ field list │ GET       │
//! │ decode      │ NestedSequencer      │ delimiter  │ Status map│
//! │ validate    │ FlatSource/Nested... │ escaping   │ Retry-Aft.│
//! └─────────────┴──────────────────────┴────────────┴───────────┘
//! ```

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::doc_markdown)]

// ============================================================================
// Module declarations
// ============================================================================

/// Error types
pub mod error;

/// Common types and type aliases
pub mod types;

/// Cursor model, wire codec and validation
pub mod cursor;

/// Page sequencers and source traits
pub mod pagination;

/// Synthetic identifiers
pub mod identity;

/// Typed field access on vendor JSON
pub mod decode;

/// Vendor HTTP client and HTTP-backed sources
pub mod http;

/// Page request handler
pub mod engine;

/// YAML loader for adapter definitions
pub mod loader;

// ============================================================================
// Re-exports
// ============================================================================

pub use error::{Error, ErrorCategory, Result};
pub use types::*;

// Re-export commonly used types
pub use cursor::{CompositeCursor, CursorToken};
pub use engine::{Page, PageHandler, PageRequest};
pub use identity::IdentityDeriver;
pub use loader::{build_handler, load_adapter, load_adapter_from_str, AdapterDefinition};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");
