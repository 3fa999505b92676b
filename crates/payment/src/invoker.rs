//! Capability invocation tool for the payment loop.
//!
//! Wraps one configured capability endpoint as an HTTP call the loop
//! can repeat with or without a payment credential. A 402 status is a
//! normal, inspectable observation here, never an error. Only
//! transport failures surface as errors.

use std::time::Duration;

use serde::Serialize;

use tendermill_core::capability::{CapabilityEndpoint, InvocationStyle};
use tendermill_core::error::CoreError;

/// HTTP timeout for one capability call.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Result count requested from search-style capabilities.
const SEARCH_LIMIT: u32 = 10;

/// What one capability call returned: the raw status plus the decoded
/// body. `status == 402` means the endpoint wants payment.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CapabilityObservation {
    pub status: u16,
    pub data: serde_json::Value,
}

impl CapabilityObservation {
    pub fn is_payment_required(&self) -> bool {
        self.status == 402
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Invokes one capability endpoint in its configured style.
pub struct CapabilityInvoker {
    endpoint: String,
    style: InvocationStyle,
    client: reqwest::Client,
}

impl CapabilityInvoker {
    /// Build an invoker from a configured entry, honoring per-request
    /// endpoint and parameter-name overrides.
    pub fn from_entry(
        entry: &CapabilityEndpoint,
        endpoint_override: Option<String>,
        parameter_override: Option<String>,
    ) -> Result<Self, CoreError> {
        let style = match (&entry.invocation, parameter_override) {
            (InvocationStyle::Query, _) => InvocationStyle::Query,
            (InvocationStyle::Parameter { name }, override_name) => InvocationStyle::Parameter {
                name: override_name.unwrap_or_else(|| name.clone()),
            },
        };
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| CoreError::Internal(format!("failed to build HTTP client: {e}")))?;
        Ok(Self {
            endpoint: endpoint_override.unwrap_or_else(|| entry.endpoint.clone()),
            style,
            client,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Call the capability with `value`, optionally carrying a payment
    /// credential in the `X-Payment` header.
    pub async fn invoke(
        &self,
        value: &str,
        payment_header: Option<&str>,
    ) -> Result<CapabilityObservation, CoreError> {
        let request = match &self.style {
            InvocationStyle::Query => self.client.post(&self.endpoint).json(&serde_json::json!({
                "query": value,
                "limit": SEARCH_LIMIT,
                "scrapeOptions": {
                    "formats": ["markdown"],
                    "onlyMainContent": true,
                },
            })),
            InvocationStyle::Parameter { name } => self
                .client
                .get(&self.endpoint)
                .query(&[(name.as_str(), value)]),
        };
        let request = match payment_header {
            Some(credential) => request.header("X-Payment", credential),
            None => request,
        };

        let response = request
            .send()
            .await
            .map_err(|e| CoreError::Upstream(format!("capability endpoint unreachable: {e}")))?;

        let status = response.status().as_u16();
        let text = response
            .text()
            .await
            .map_err(|e| CoreError::Upstream(format!("failed to read capability response: {e}")))?;
        // Non-JSON bodies are kept as raw text.
        let data = serde_json::from_str(&text).unwrap_or(serde_json::Value::String(text));

        tracing::debug!(
            endpoint = %self.endpoint,
            status,
            payment_required = status == 402,
            "Capability responded"
        );
        Ok(CapabilityObservation { status, data })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use tendermill_core::capability::CapabilityKind;

    fn news_entry() -> CapabilityEndpoint {
        CapabilityEndpoint {
            kind: CapabilityKind::News,
            endpoint: "https://api.news.example/news".into(),
            method: "GET".into(),
            invocation: InvocationStyle::Parameter {
                name: "feed_categories".into(),
            },
            price_per_call: 0.01,
        }
    }

    #[test]
    fn overrides_replace_endpoint_and_parameter_name() {
        let invoker = CapabilityInvoker::from_entry(
            &news_entry(),
            Some("https://api.news.example/recaps".into()),
            Some("topic".into()),
        )
        .unwrap();
        assert_eq!(invoker.endpoint(), "https://api.news.example/recaps");
        assert_eq!(
            invoker.style,
            InvocationStyle::Parameter {
                name: "topic".into()
            }
        );
    }

    #[test]
    fn defaults_come_from_the_configured_entry() {
        let invoker = CapabilityInvoker::from_entry(&news_entry(), None, None).unwrap();
        assert_eq!(invoker.endpoint(), "https://api.news.example/news");
        assert_eq!(
            invoker.style,
            InvocationStyle::Parameter {
                name: "feed_categories".into()
            }
        );
    }

    #[test]
    fn observation_classifies_statuses() {
        let paid = CapabilityObservation {
            status: 200,
            data: serde_json::json!({"articles": []}),
        };
        assert!(paid.is_success());
        assert!(!paid.is_payment_required());

        let challenged = CapabilityObservation {
            status: 402,
            data: serde_json::json!({"paymentDetails": {}}),
        };
        assert!(challenged.is_payment_required());
        assert!(!challenged.is_success());
    }
}
