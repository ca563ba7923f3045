//! Loader types
//!
//! Declarative adapter definition types for YAML parsing.

use crate::http::Endpoint;
use crate::identity::{DEFAULT_DELIMITER, DEFAULT_TARGET};
use crate::types::PaginationMode;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

// ============================================================================
// Adapter Definition
// ============================================================================

/// Top-level adapter definition
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct AdapterDefinition {
    /// Adapter name
    pub name: String,
    /// Adapter version
    #[serde(default = "default_version")]
    pub version: String,
    /// Base URL for all requests
    pub base_url: String,
    /// Budget for one page request, in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Largest page size a caller may request
    #[serde(default = "default_max_page_size")]
    pub max_page_size: usize,
    /// Headers sent with every request (credentials)
    #[serde(default)]
    pub headers: HashMap<String, String>,
    /// Entity definitions
    pub entities: Vec<EntityDefinition>,
}

fn default_version() -> String {
    "0.1.0".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_max_page_size() -> usize {
    crate::engine::DEFAULT_MAX_PAGE_SIZE
}

// ============================================================================
// Entity Definition
// ============================================================================

/// One entity exposed by the adapter
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct EntityDefinition {
    /// Entity name used in page requests
    pub id: String,
    /// How the remote collection is paged
    #[serde(default)]
    pub pagination: PaginationMode,
    /// Endpoint returning the entity's records
    pub request: EndpointDefinition,
    /// Outer collection, for entities read per parent item
    #[serde(default)]
    pub nested: Option<NestedDefinition>,
    /// Synthetic ID derivation
    #[serde(default)]
    pub identity: Option<IdentityDefinition>,
}

impl EntityDefinition {
    /// Whether cursors of this entity may carry collection fields
    pub fn allows_nesting(&self) -> bool {
        self.nested.is_some()
    }
}

/// Endpoint and response layout
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct EndpointDefinition {
    /// URL path, relative to `base_url`
    pub path: String,
    /// Dotted path to the record array
    #[serde(default)]
    pub records_path: Option<String>,
    /// Dotted path to the vendor continuation token
    #[serde(default)]
    pub next_token_path: Option<String>,
    /// Dotted path to the vendor "more results" flag
    #[serde(default)]
    pub has_more_path: Option<String>,
    /// Offset query parameter
    #[serde(default = "default_offset_param")]
    pub offset_param: String,
    /// Page size query parameter
    #[serde(default = "default_limit_param")]
    pub limit_param: String,
    /// Continuation token query parameter
    #[serde(default = "default_token_param")]
    pub token_param: String,
}

fn default_offset_param() -> String {
    "offset".to_string()
}

fn default_limit_param() -> String {
    "limit".to_string()
}

fn default_token_param() -> String {
    "cursor".to_string()
}

impl EndpointDefinition {
    /// Convert into a client endpoint
    pub fn to_endpoint(&self) -> Endpoint {
        let mut endpoint = Endpoint::new(&self.path).with_params(
            &self.offset_param,
            &self.limit_param,
            &self.token_param,
        );
        endpoint.records_path.clone_from(&self.records_path);
        endpoint.next_token_path.clone_from(&self.next_token_path);
        endpoint.has_more_path.clone_from(&self.has_more_path);
        endpoint
    }
}

/// Outer collection of a nested entity
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct NestedDefinition {
    /// Endpoint listing the outer items
    pub outer: EndpointDefinition,
    /// Field of an outer item holding its id
    #[serde(default = "default_id_field")]
    pub id_field: String,
}

fn default_id_field() -> String {
    "id".to_string()
}

/// Synthetic ID configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct IdentityDefinition {
    /// Ordered source fields
    pub fields: Vec<String>,
    /// Field delimiter
    #[serde(default = "default_delimiter")]
    pub delimiter: String,
    /// Attribute the ID is written to
    #[serde(default = "default_target")]
    pub target: String,
}

fn default_delimiter() -> String {
    DEFAULT_DELIMITER.to_string()
}

fn default_target() -> String {
    DEFAULT_TARGET.to_string()
}
