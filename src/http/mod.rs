//! HTTP module
//!
//! Vendor API access for the pagination engine.
//!
//! # Features
//!
//! - **Single-shot requests**: one GET per page, no hidden retries
//! - **Status mapping**: vendor statuses translated into retryable or fatal errors
//! - **Retry hints**: `Retry-After` parsed as seconds or HTTP date
//! - **Sources**: `FlatSource`/`NestedSource` implementations over HTTP

mod client;
mod errors;
mod sources;

pub use client::{
    Endpoint, PageQuery, VendorClient, VendorClientConfig, VendorClientConfigBuilder,
    VendorResponse,
};
pub use errors::{map_status, parse_retry_after};
pub use sources::{HttpFlatSource, HttpNestedSource};
