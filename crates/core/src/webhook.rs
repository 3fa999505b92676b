//! Webhook registrations.
//!
//! A webhook is created once by registration, lives indefinitely, and
//! is never mutated. Any registered URL is trusted; deliveries carry no
//! signature.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::EntityId;

/// A registered webhook subscriber.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Webhook {
    pub id: EntityId,
    pub url: String,
    pub created_at: DateTime<Utc>,
}

/// Cheap structural check that a string looks like an HTTP(S) URL with
/// a host part. Full parsing happens in the HTTP client at delivery
/// time; this catches registration typos early.
pub fn is_http_url(s: &str) -> bool {
    let rest = if let Some(rest) = s.strip_prefix("https://") {
        rest
    } else if let Some(rest) = s.strip_prefix("http://") {
        rest
    } else {
        return false;
    };
    let host = rest.split(['/', '?', '#']).next().unwrap_or("");
    !host.is_empty()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_http_and_https_urls() {
        assert!(is_http_url("https://example.com/hooks/tender"));
        assert!(is_http_url("http://localhost:3000/webhook"));
    }

    #[test]
    fn rejects_other_schemes_and_garbage() {
        assert!(!is_http_url("ftp://example.com"));
        assert!(!is_http_url("example.com/webhook"));
        assert!(!is_http_url("https://"));
        assert!(!is_http_url(""));
    }
}
