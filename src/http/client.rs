//! Vendor HTTP client
//!
//! Performs exactly one GET per call and reports what the vendor said:
//! records, continuation token, "more" flag, status and retry hint.
//! Retries are left to the caller, who can always resubmit the same cursor.

use super::errors::{map_status, parse_retry_after};
use crate::cursor::TokenType;
use crate::decode::{lookup_value, optional_bool, JsonDecoder};
use crate::error::{Error, Result};
use crate::types::{json_type_name, JsonObject, JsonValue};
use chrono::Utc;
use reqwest::header::RETRY_AFTER;
use reqwest::Client;
use std::collections::HashMap;
use std::time::Duration;
use tracing::debug;
use url::Url;

/// Configuration for the vendor client
#[derive(Debug, Clone)]
pub struct VendorClientConfig {
    /// Base URL for all requests
    pub base_url: Option<String>,
    /// Per-request timeout
    pub timeout: Duration,
    /// Headers sent with every request (credentials live here)
    pub default_headers: HashMap<String, String>,
    /// User agent string
    pub user_agent: String,
}

impl Default for VendorClientConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            timeout: Duration::from_secs(30),
            default_headers: HashMap::new(),
            user_agent: format!("connector-paging/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl VendorClientConfig {
    /// Create a new config builder
    pub fn builder() -> VendorClientConfigBuilder {
        VendorClientConfigBuilder::default()
    }
}

/// Builder for vendor client config
#[derive(Default)]
pub struct VendorClientConfigBuilder {
    config: VendorClientConfig,
}

impl VendorClientConfigBuilder {
    /// Set the base URL
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.config.base_url = Some(url.into());
        self
    }

    /// Set the request timeout
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = timeout;
        self
    }

    /// Add a default header
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.config.default_headers.insert(key.into(), value.into());
        self
    }

    /// Set user agent
    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.config.user_agent = agent.into();
        self
    }

    /// Build the config
    pub fn build(self) -> VendorClientConfig {
        self.config
    }
}

/// Where an entity lives and how its responses are laid out
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    /// Path relative to the base URL; may contain `{collection_id}`
    pub path: String,
    /// Dotted path to the record array (`None`: the body is the array)
    pub records_path: Option<String>,
    /// Dotted path to the vendor continuation token
    pub next_token_path: Option<String>,
    /// Dotted path to the vendor "more results" flag
    pub has_more_path: Option<String>,
    /// Query parameter carrying the offset
    pub offset_param: String,
    /// Query parameter carrying the page size
    pub limit_param: String,
    /// Query parameter carrying the continuation token
    pub token_param: String,
}

impl Endpoint {
    /// Endpoint with `offset`/`limit`/`cursor` query parameters
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            records_path: None,
            next_token_path: None,
            has_more_path: None,
            offset_param: "offset".to_string(),
            limit_param: "limit".to_string(),
            token_param: "cursor".to_string(),
        }
    }

    /// Set the record path
    #[must_use]
    pub fn with_records_path(mut self, path: impl Into<String>) -> Self {
        self.records_path = Some(path.into());
        self
    }

    /// Set the continuation token path
    #[must_use]
    pub fn with_next_token_path(mut self, path: impl Into<String>) -> Self {
        self.next_token_path = Some(path.into());
        self
    }

    /// Set the "more results" flag path
    #[must_use]
    pub fn with_has_more_path(mut self, path: impl Into<String>) -> Self {
        self.has_more_path = Some(path.into());
        self
    }

    /// Override the query parameter names
    #[must_use]
    pub fn with_params(
        mut self,
        offset_param: impl Into<String>,
        limit_param: impl Into<String>,
        token_param: impl Into<String>,
    ) -> Self {
        self.offset_param = offset_param.into();
        self.limit_param = limit_param.into();
        self.token_param = token_param.into();
        self
    }

    /// Copy of this endpoint with `{collection_id}` filled in
    ///
    /// The id is percent-encoded as a single path segment.
    pub fn for_collection(&self, collection_id: &str) -> Result<Self> {
        let encoded = encode_path_segment(collection_id)?;
        Ok(Self {
            path: self.path.replace("{collection_id}", &encoded),
            ..self.clone()
        })
    }

    fn position_param(&self, token_type: TokenType) -> &str {
        match token_type {
            TokenType::Int64 => &self.offset_param,
            TokenType::String => &self.token_param,
        }
    }
}

/// Page parameters of one vendor call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageQuery {
    /// Rendered position (offset or token); `None` on the first page
    pub position: Option<String>,
    /// Kind of position, selects the query parameter
    pub token_type: TokenType,
    /// Page size
    pub limit: usize,
}

/// What the vendor returned for one call
#[derive(Debug, Clone, PartialEq)]
pub struct VendorResponse {
    /// Records on the page
    pub objects: Vec<JsonObject>,
    /// Continuation token, rendered as text
    pub next_token: Option<String>,
    /// Explicit "more results" flag
    pub has_more: Option<bool>,
    /// HTTP status
    pub status: u16,
    /// Parsed `Retry-After` hint
    pub retry_after: Option<Duration>,
}

/// HTTP client for vendor APIs
pub struct VendorClient {
    client: Client,
    config: VendorClientConfig,
}

impl VendorClient {
    /// Create a new vendor client
    pub fn new(config: VendorClientConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(&config.user_agent)
            .build()?;
        Ok(Self { client, config })
    }

    /// Client configuration
    pub fn config(&self) -> &VendorClientConfig {
        &self.config
    }

    /// Fetch one page from `endpoint`
    pub async fn fetch(&self, endpoint: &Endpoint, query: &PageQuery) -> Result<VendorResponse> {
        let url = self.build_url(&endpoint.path)?;

        let mut req = self
            .client
            .get(url.clone())
            .timeout(self.config.timeout)
            .query(&[(endpoint.limit_param.as_str(), query.limit.to_string())]);
        if let Some(position) = &query.position {
            req = req.query(&[(endpoint.position_param(query.token_type), position.as_str())]);
        }
        for (key, value) in &self.config.default_headers {
            req = req.header(key.as_str(), value.as_str());
        }

        let response = req.send().await.map_err(|e| self.transport_error(&e))?;
        let status = response.status().as_u16();
        let retry_after = response
            .headers()
            .get(RETRY_AFTER)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| parse_retry_after(v, Utc::now()));

        let body = response
            .text()
            .await
            .map_err(|e| self.transport_error(&e))?;

        if let Some(err) = map_status(status, retry_after, &body) {
            debug!(%url, status, "Vendor request failed");
            return Err(err);
        }

        let value: JsonValue = serde_json::from_str(&body)
            .map_err(|e| Error::data_shape("body", "JSON document", e.to_string()))?;

        let decoder = match &endpoint.records_path {
            Some(path) => JsonDecoder::with_path(path),
            None => JsonDecoder::new(),
        };
        let objects = decoder.extract_records(&value)?;
        let next_token = endpoint
            .next_token_path
            .as_deref()
            .map(|path| token_at(&value, path))
            .transpose()?
            .flatten();
        let has_more = endpoint
            .has_more_path
            .as_deref()
            .map(|path| flag_at(&value, path))
            .transpose()?
            .flatten();

        debug!(
            %url,
            status,
            returned = objects.len(),
            has_more = ?has_more,
            "Vendor page fetched"
        );

        Ok(VendorResponse {
            objects,
            next_token,
            has_more,
            status,
            retry_after,
        })
    }

    /// Build full URL from path
    fn build_url(&self, path: &str) -> Result<Url> {
        if path.starts_with("http://") || path.starts_with("https://") {
            return Ok(Url::parse(path)?);
        }

        match &self.config.base_url {
            Some(base) => {
                let base = base.trim_end_matches('/');
                let path = path.trim_start_matches('/');
                Ok(Url::parse(&format!("{base}/{path}"))?)
            }
            None => Err(Error::config(format!(
                "Relative path '{path}' requires a base URL"
            ))),
        }
    }

    fn transport_error(&self, e: &reqwest::Error) -> Error {
        if e.is_timeout() {
            Error::timeout(self.config.timeout)
        } else {
            Error::unavailable(e.to_string(), e.status().map(|s| s.as_u16()), None)
        }
    }
}

impl std::fmt::Debug for VendorClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VendorClient")
            .field("base_url", &self.config.base_url)
            .field("timeout", &self.config.timeout)
            .finish_non_exhaustive()
    }
}

/// Percent-encode `segment` the way `Url` encodes one path segment
fn encode_path_segment(segment: &str) -> Result<String> {
    // `push` drops dot segments
    match segment {
        "." => return Ok("%2E".to_string()),
        ".." => return Ok("%2E%2E".to_string()),
        _ => {}
    }

    let mut scratch = Url::parse("http://localhost/")?;
    scratch
        .path_segments_mut()
        .map_err(|()| Error::config("Cannot encode collection id as a path segment"))?
        .clear()
        .push(segment);
    Ok(scratch.path().trim_start_matches('/').to_string())
}

/// Continuation token at `path`; null, missing and empty mean "no token"
fn token_at(value: &JsonValue, path: &str) -> Result<Option<String>> {
    match lookup_value(value, path) {
        None | Some(JsonValue::Null) => Ok(None),
        Some(JsonValue::String(s)) if s.is_empty() => Ok(None),
        Some(JsonValue::String(s)) => Ok(Some(s.clone())),
        Some(n @ JsonValue::Number(_)) => Ok(Some(n.to_string())),
        Some(other) => Err(Error::data_shape(
            path,
            "string or number",
            json_type_name(other),
        )),
    }
}

/// "More results" flag at `path`; only object bodies carry one
fn flag_at(value: &JsonValue, path: &str) -> Result<Option<bool>> {
    match value {
        JsonValue::Object(body) => optional_bool(body, path),
        _ => Ok(None),
    }
}
