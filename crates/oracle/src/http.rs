//! HTTP implementation of the oracle contract.
//!
//! POSTs `{prompt, schema}` to `{base_url}/generate` and expects a
//! JSON body `{object, usage}` back.

use std::time::Duration;

use async_trait::async_trait;

use crate::{GenerateRequest, GenerateResponse, Oracle, OracleError};

/// Request timeout for a single generation. Generations are slow;
/// webhook-style timeouts would starve them.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

/// How much of an error body to keep in the error message.
const BODY_SNIPPET_LEN: usize = 200;

/// Oracle client over plain HTTP.
pub struct HttpOracle {
    base_url: String,
    api_key: Option<String>,
    client: reqwest::Client,
}

impl HttpOracle {
    /// Create a client for the oracle at `base_url` (no trailing slash).
    pub fn new(base_url: impl Into<String>, api_key: Option<String>) -> Self {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .expect("Failed to build reqwest HTTP client");
        Self {
            base_url: base_url.into(),
            api_key,
            client,
        }
    }
}

#[async_trait]
impl Oracle for HttpOracle {
    async fn generate(&self, request: GenerateRequest) -> Result<GenerateResponse, OracleError> {
        let url = format!("{}/generate", self.base_url);

        let mut req = self.client.post(&url).json(&request);
        if let Some(key) = &self.api_key {
            req = req.bearer_auth(key);
        }

        let response = req
            .send()
            .await
            .map_err(|e| OracleError::Connection(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let snippet: String = body.chars().take(BODY_SNIPPET_LEN).collect();
            tracing::warn!(status = status.as_u16(), "Oracle returned error status");
            return Err(OracleError::Http {
                status: status.as_u16(),
                body: snippet,
            });
        }

        let generated: GenerateResponse = response
            .json()
            .await
            .map_err(|e| OracleError::Contract(format!("unparseable oracle response: {e}")))?;

        tracing::debug!(
            prompt_tokens = generated.usage.prompt_tokens,
            completion_tokens = generated.usage.completion_tokens,
            "Oracle generation complete"
        );
        Ok(generated)
    }
}
