//! Mapping of vendor HTTP outcomes onto the crate's error taxonomy

use crate::error::{is_retryable_status, Error};
use chrono::{DateTime, Utc};
use std::time::Duration;

/// Translate an HTTP status into an error, or `None` for success
///
/// - 408, 429, 5xx: `UpstreamUnavailable`, carrying the vendor retry hint
/// - any other non-2xx: `HttpStatus` (not retryable)
pub fn map_status(status: u16, retry_after: Option<Duration>, body: &str) -> Option<Error> {
    match status {
        200..=299 => None,
        _ if is_retryable_status(status) || (500..=599).contains(&status) => Some(
            Error::unavailable(
                format!("vendor responded with HTTP {status}"),
                Some(status),
                retry_after,
            ),
        ),
        _ => Some(Error::http_status(status, truncate(body, 512))),
    }
}

/// Parse a `Retry-After` header value relative to `now`
///
/// Accepts delta-seconds or an HTTP date. Dates in the past yield zero.
pub fn parse_retry_after(value: &str, now: DateTime<Utc>) -> Option<Duration> {
    let value = value.trim();
    if let Ok(seconds) = value.parse::<u64>() {
        return Some(Duration::from_secs(seconds));
    }
    let at = DateTime::parse_from_rfc2822(value).ok()?;
    Some(
        at.with_timezone(&Utc)
            .signed_duration_since(now)
            .to_std()
            .unwrap_or(Duration::ZERO),
    )
}

fn truncate(body: &str, max: usize) -> String {
    match body.char_indices().nth(max) {
        Some((idx, _)) => format!("{}...", &body[..idx]),
        None => body.to_string(),
    }
}
