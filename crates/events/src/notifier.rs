//! Webhook fan-out for `tender.created` events.
//!
//! [`WebhookNotifier`] POSTs the JSON payload to every registered
//! subscriber URL concurrently. Delivery is at-most-one-attempt,
//! best-effort: a timeout or non-2xx response is logged and the
//! destination is skipped. There is no retry, no backoff, no
//! dead-letter queue, and no failing destination cancels its siblings.

use std::time::Duration;

use futures::future::join_all;

use tendermill_core::tender::Tender;
use tendermill_core::webhook::Webhook;

use crate::payload::TenderCreated;

/// HTTP request timeout for a single delivery attempt.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

// ---------------------------------------------------------------------------
// Error
// ---------------------------------------------------------------------------

/// Why one delivery attempt failed. Never escapes the notifier; it is
/// logged and folded into the [`NotifyReport`].
#[derive(Debug, thiserror::Error)]
enum DeliveryError {
    /// The underlying HTTP request failed (network, DNS, timeout).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The subscriber returned a non-2xx status code.
    #[error("Webhook returned HTTP {0}")]
    HttpStatus(u16),
}

// ---------------------------------------------------------------------------
// NotifyReport
// ---------------------------------------------------------------------------

/// Outcome summary of one fan-out. Informational only; fan-out as a
/// whole never fails.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NotifyReport {
    pub delivered: usize,
    pub failed: usize,
}

// ---------------------------------------------------------------------------
// WebhookNotifier
// ---------------------------------------------------------------------------

/// Delivers `tender.created` events to subscriber URLs.
pub struct WebhookNotifier {
    client: reqwest::Client,
}

impl WebhookNotifier {
    /// Create a notifier with a pre-configured HTTP client.
    pub fn new() -> Self {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .expect("Failed to build reqwest HTTP client");
        Self { client }
    }

    /// Deliver one `tender.created` event to every given webhook.
    ///
    /// All deliveries proceed concurrently with settle-all semantics:
    /// the call returns once every destination has succeeded, failed,
    /// or timed out. There is no ordering guarantee across
    /// destinations.
    pub async fn notify_all(&self, webhooks: &[Webhook], tender: &Tender) -> NotifyReport {
        if webhooks.is_empty() {
            return NotifyReport::default();
        }

        tracing::info!(
            tender_id = %tender.id,
            count = webhooks.len(),
            "Notifying webhooks of new tender"
        );

        let payload = serde_json::to_value(TenderCreated::new(tender.clone()))
            .unwrap_or(serde_json::Value::Null);

        let deliveries = webhooks.iter().map(|webhook| {
            let payload = &payload;
            async move {
                match self.try_send(&webhook.url, payload).await {
                    Ok(()) => {
                        tracing::debug!(url = %webhook.url, "Webhook notified");
                        true
                    }
                    Err(e) => {
                        tracing::warn!(
                            url = %webhook.url,
                            error = %e,
                            "Webhook delivery failed, continuing"
                        );
                        false
                    }
                }
            }
        });

        let results = join_all(deliveries).await;
        let delivered = results.iter().filter(|ok| **ok).count();
        let report = NotifyReport {
            delivered,
            failed: results.len() - delivered,
        };

        tracing::info!(
            tender_id = %tender.id,
            delivered = report.delivered,
            failed = report.failed,
            "Webhook fan-out complete"
        );
        report
    }

    /// Execute a single POST and check the response status.
    async fn try_send(&self, url: &str, payload: &serde_json::Value) -> Result<(), DeliveryError> {
        let response = self.client.post(url).json(payload).send().await?;
        if !response.status().is_success() {
            return Err(DeliveryError::HttpStatus(response.status().as_u16()));
        }
        Ok(())
    }
}

impl Default for WebhookNotifier {
    fn default() -> Self {
        Self::new()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
