//! Mapping of transport failures and response statuses onto [`WikiError`].

use reqwest::StatusCode;

use crate::error::WikiError;
use crate::request::RawResponse;

/// Longest slice of a response body quoted in an HTTP error message.
const MAX_BODY_EXCERPT: usize = 200;

/// Classify a failure reported by reqwest.
///
/// `timeout_ms` is the configured per-attempt timeout, echoed back in the
/// `Timeout` message.
pub fn classify_transport(err: &reqwest::Error, timeout_ms: u64) -> WikiError {
    if err.is_timeout() {
        WikiError::Timeout { timeout_ms }
    } else if err.is_connect() || err.is_request() || err.is_body() {
        WikiError::Connection(describe(err))
    } else if err.is_decode() {
        WikiError::Protocol(describe(err))
    } else if err.is_builder() {
        WikiError::validation(format!("Invalid request: {}", describe(err)))
    } else {
        WikiError::internal(describe(err))
    }
}

/// Turn a non-success response into an error. 2xx answers yield `None`.
pub fn classify_status(response: &RawResponse) -> Option<WikiError> {
    let status = response.status;
    if (200..300).contains(&status) {
        return None;
    }

    let message = status_message(status, &response.body);
    Some(match status {
        400..=499 => WikiError::Client { status, message },
        500..=599 => WikiError::Server { status, message },
        _ => WikiError::Protocol(format!("unexpected HTTP status {}", status)),
    })
}

fn status_message(status: u16, body: &str) -> String {
    let body = body.trim();
    if body.is_empty() {
        return StatusCode::from_u16(status)
            .ok()
            .and_then(|s| s.canonical_reason())
            .unwrap_or("no response body")
            .to_string();
    }

    let mut excerpt: String = body.chars().take(MAX_BODY_EXCERPT).collect();
    if body.chars().count() > MAX_BODY_EXCERPT {
        excerpt.push_str("...");
    }
    excerpt
}

// reqwest's Display includes the URL; the inner source is the useful part.
fn describe(err: &reqwest::Error) -> String {
    use std::error::Error as _;
    match err.source() {
        Some(source) => format!("{} ({})", err, source),
        None => err.to_string(),
    }
}
