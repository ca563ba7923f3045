//! Response decoding module
//!
//! Vendor payloads are dynamic JSON. This module turns them into record
//! objects and offers typed, fallible field accessors so that a surprising
//! payload surfaces as `Error::UpstreamDataShape` instead of a panic.

mod decoders;
mod fields;

pub use decoders::JsonDecoder;
pub use fields::{lookup, lookup_value, optional_bool, require_id, scalar_string};
