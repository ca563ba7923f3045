//! Identity module
//!
//! Deterministic synthetic IDs for vendor records that lack a unique key.

mod deriver;

pub use deriver::{IdentityDeriver, DEFAULT_DELIMITER, DEFAULT_TARGET};
