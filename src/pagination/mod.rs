//! Pagination module
//!
//! Supports: flat offset/token collections and two-level (parent/child)
//! collections flattened into one listing.
//!
//! # Overview
//!
//! A page request is stateless. The sequencers read the incoming cursor,
//! plan a fetch, run it through a source, and emit the cursor for the next
//! request. Sources only know how to fetch; they never see cursors.
//!
//! - `FlatSequencer` + `FlatSource` - one remote collection
//! - `NestedSequencer` + `NestedSource` - "inner items of every outer item",
//!   using one outer fetch and one inner fetch per request at most

mod sequencer;
mod types;

pub use sequencer::{FlatSequencer, NestedSequencer};
pub use types::{FetchPlan, FlatSource, NestedSource, RawPage, SequencedPage};
