//! Cursor module
//!
//! Opaque, round-trippable cursors for stateless page requests.
//!
//! # Overview
//!
//! The cursor module provides:
//! - `CompositeCursor<T>` - primary position plus the collection fields used
//!   by two-level (parent/child) traversal
//! - `encode` / `decode` - the base64 JSON wire format
//! - `validate` - structural checks against an entity's nesting capability

mod codec;
mod types;
mod validator;

pub use codec::{decode, decode_optional, encode, encode_next};
pub use types::{CompositeCursor, CursorToken, TokenType};
pub use validator::validate;
