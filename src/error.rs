//! Error types for connector-paging
//!
//! This module defines the error hierarchy for the whole crate.
//! All public APIs return `Result<T, Error>` where Error is defined here.

use std::time::Duration;
use thiserror::Error;

/// The main error type for connector-paging
#[derive(Error, Debug)]
pub enum Error {
    // ============================================================================
    // Cursor Errors
    // ============================================================================
    #[error("Malformed cursor: {message}")]
    MalformedCursor { message: String },

    #[error("Cursor field '{field}' has type {actual}, expected {expected}")]
    CursorTypeMismatch {
        field: String,
        expected: String,
        actual: String,
    },

    #[error("Invalid cursor for entity '{entity}' ({field}): {message}")]
    InvalidCursorState {
        entity: String,
        field: String,
        message: String,
    },

    // ============================================================================
    // Page Request Errors
    // ============================================================================
    #[error("Entity '{entity}' is not registered")]
    EntityNotFound { entity: String },

    #[error("Invalid page size {page_size}: {message}")]
    InvalidPageSize { page_size: usize, message: String },

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Failed to parse YAML: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    // ============================================================================
    // Upstream Errors
    // ============================================================================
    #[error("Upstream request timed out after {timeout_ms}ms")]
    UpstreamTimeout { timeout_ms: u64 },

    #[error("Upstream unavailable: {message}")]
    UpstreamUnavailable {
        message: String,
        status: Option<u16>,
        retry_after: Option<Duration>,
    },

    #[error("Unexpected upstream data for field '{field}': expected {expected}, got {actual}")]
    UpstreamDataShape {
        field: String,
        expected: String,
        actual: String,
    },

    #[error("HTTP {status}: {body}")]
    HttpStatus { status: u16, body: String },

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("Page request cancelled")]
    Cancelled,

    // ============================================================================
    // Generic Errors
    // ============================================================================
    #[error("Failed to read '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{0}")]
    Other(String),
}

/// Broad classes of failure, used by callers to decide how to react
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// The request itself is wrong (cursor, entity, page size). Not retryable as-is.
    PageRequestConfig,
    /// The vendor API failed or was unreachable. Retry with the same cursor.
    Upstream,
    /// A bug or an unexpected vendor contract change.
    Internal,
}

impl Error {
    /// Create a malformed cursor error
    pub fn malformed_cursor(message: impl Into<String>) -> Self {
        Self::MalformedCursor {
            message: message.into(),
        }
    }

    /// Create a cursor type mismatch error
    pub fn type_mismatch(
        field: impl Into<String>,
        expected: impl Into<String>,
        actual: impl Into<String>,
    ) -> Self {
        Self::CursorTypeMismatch {
            field: field.into(),
            expected: expected.into(),
            actual: actual.into(),
        }
    }

    /// Create an invalid cursor state error
    pub fn invalid_cursor(
        entity: impl Into<String>,
        field: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::InvalidCursorState {
            entity: entity.into(),
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create a data shape error
    pub fn data_shape(
        field: impl Into<String>,
        expected: impl Into<String>,
        actual: impl Into<String>,
    ) -> Self {
        Self::UpstreamDataShape {
            field: field.into(),
            expected: expected.into(),
            actual: actual.into(),
        }
    }

    /// Create an upstream unavailable error
    pub fn unavailable(
        message: impl Into<String>,
        status: Option<u16>,
        retry_after: Option<Duration>,
    ) -> Self {
        Self::UpstreamUnavailable {
            message: message.into(),
            status,
            retry_after,
        }
    }

    /// Create a timeout error from the elapsed budget
    pub fn timeout(timeout: Duration) -> Self {
        Self::UpstreamTimeout {
            timeout_ms: u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX),
        }
    }

    /// Create a config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create an HTTP status error
    pub fn http_status(status: u16, body: impl Into<String>) -> Self {
        Self::HttpStatus {
            status,
            body: body.into(),
        }
    }

    /// Classify this error
    pub fn category(&self) -> ErrorCategory {
        match self {
            Error::MalformedCursor { .. }
            | Error::CursorTypeMismatch { .. }
            | Error::InvalidCursorState { .. }
            | Error::EntityNotFound { .. }
            | Error::InvalidPageSize { .. }
            | Error::Config { .. }
            | Error::YamlParse(_)
            | Error::Io { .. } => ErrorCategory::PageRequestConfig,
            Error::UpstreamTimeout { .. }
            | Error::UpstreamUnavailable { .. }
            | Error::HttpStatus { .. }
            | Error::Http(_)
            | Error::Cancelled => ErrorCategory::Upstream,
            _ => ErrorCategory::Internal,
        }
    }

    /// Check if repeating the same page request may succeed
    pub fn is_retryable(&self) -> bool {
        match self {
            Error::UpstreamTimeout { .. } | Error::UpstreamUnavailable { .. } | Error::Cancelled => {
                true
            }
            Error::Http(e) => e.is_timeout() || e.is_connect(),
            Error::HttpStatus { status, .. } => is_retryable_status(*status),
            _ => false,
        }
    }

    /// Vendor-supplied retry hint, if any
    pub fn retry_after(&self) -> Option<Duration> {
        match self {
            Error::UpstreamUnavailable { retry_after, .. } => *retry_after,
            _ => None,
        }
    }
}

/// Check if an HTTP status code is retryable
pub(crate) fn is_retryable_status(status: u16) -> bool {
    matches!(status, 408 | 429 | 500 | 502 | 503 | 504)
}

/// Result type alias for connector-paging
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::type_mismatch("cursor", "int64", "string");
        assert_eq!(
            err.to_string(),
            "Cursor field 'cursor' has type string, expected int64"
        );

        let err = Error::invalid_cursor("Group", "collectionId", "not supported");
        assert_eq!(
            err.to_string(),
            "Invalid cursor for entity 'Group' (collectionId): not supported"
        );

        let err = Error::data_shape("id", "string", "array");
        assert_eq!(
            err.to_string(),
            "Unexpected upstream data for field 'id': expected string, got array"
        );
    }

    #[test]
    fn test_categories() {
        assert_eq!(
            Error::malformed_cursor("bad").category(),
            ErrorCategory::PageRequestConfig
        );
        assert_eq!(
            Error::invalid_cursor("Group", "cursor", "x").category(),
            ErrorCategory::PageRequestConfig
        );
        assert_eq!(
            Error::timeout(Duration::from_secs(1)).category(),
            ErrorCategory::Upstream
        );
        assert_eq!(
            Error::data_shape("id", "string", "null").category(),
            ErrorCategory::Internal
        );
    }

    #[test]
    fn test_is_retryable() {
        assert!(Error::timeout(Duration::from_millis(500)).is_retryable());
        assert!(Error::unavailable("down", Some(503), None).is_retryable());
        assert!(Error::Cancelled.is_retryable());
        assert!(Error::http_status(429, "").is_retryable());

        assert!(!Error::http_status(404, "").is_retryable());
        assert!(!Error::malformed_cursor("x").is_retryable());
        assert!(!Error::data_shape("id", "string", "number").is_retryable());
    }

    #[test]
    fn test_retry_after() {
        let err = Error::unavailable("slow down", Some(429), Some(Duration::from_secs(7)));
        assert_eq!(err.retry_after(), Some(Duration::from_secs(7)));
        assert_eq!(Error::Cancelled.retry_after(), None);
    }

    #[test]
    fn test_timeout_millis() {
        let err = Error::timeout(Duration::from_millis(1500));
        assert_eq!(err.to_string(), "Upstream request timed out after 1500ms");
    }
}
