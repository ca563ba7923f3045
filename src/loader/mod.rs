//! YAML Loader module
//!
//! Parse adapter definitions from YAML files and build page handlers.
//!
//! # Overview
//!
//! The loader module provides:
//! - `AdapterDefinition` - Declarative adapter specification
//! - `EntityDefinition` - Entity configuration (flat or nested)
//! - YAML parsing with validation
//! - `build_handler` - adapter definition to `PageHandler`

mod builder;
mod parser;
mod types;

pub use builder::build_handler;
pub use parser::{load_adapter, load_adapter_from_str, COLLECTION_ID_PLACEHOLDER};
pub use types::{
    AdapterDefinition, EndpointDefinition, EntityDefinition, IdentityDefinition, NestedDefinition,
};
