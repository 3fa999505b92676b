//! Payment-tool provider client.
//!
//! The provider exposes an opaque set of named payment tools. We never
//! interpret their semantics; the decision loop picks one by name and
//! forwards its arguments verbatim.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use tendermill_core::error::CoreError;

/// HTTP timeout for one provider call.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// One tool advertised by the payment provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentTool {
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// Input schema as the provider describes it. Opaque to us.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub input_schema: Option<serde_json::Value>,
}

/// External payment-capability provider.
///
/// Production uses [`HttpPaymentProvider`]; tests script this seam.
/// Connectivity failures here are fatal for the whole payment call.
#[async_trait]
pub trait PaymentToolProvider: Send + Sync {
    /// List the tools the provider currently offers.
    async fn list_tools(&self) -> Result<Vec<PaymentTool>, CoreError>;

    /// Invoke one tool by name with opaque JSON arguments.
    async fn invoke(
        &self,
        name: &str,
        arguments: serde_json::Value,
    ) -> Result<serde_json::Value, CoreError>;
}

// ---------------------------------------------------------------------------
// HTTP implementation
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct ToolListBody {
    tools: Vec<PaymentTool>,
}

/// HTTP client for a payment-tool provider: `GET {base}/tools` lists,
/// `POST {base}/tools/{name}` invokes.
pub struct HttpPaymentProvider {
    base_url: String,
    api_key: Option<String>,
    client: reqwest::Client,
}

impl HttpPaymentProvider {
    pub fn new(base_url: impl Into<String>, api_key: Option<String>) -> Result<Self, CoreError> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| CoreError::Internal(format!("failed to build HTTP client: {e}")))?;
        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key,
            client,
        })
    }

    fn authorize(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.api_key {
            Some(key) => request.bearer_auth(key),
            None => request,
        }
    }
}

#[async_trait]
impl PaymentToolProvider for HttpPaymentProvider {
    async fn list_tools(&self) -> Result<Vec<PaymentTool>, CoreError> {
        let url = format!("{}/tools", self.base_url);
        let response = self
            .authorize(self.client.get(&url))
            .send()
            .await
            .map_err(|e| CoreError::Upstream(format!("payment provider unreachable: {e}")))?;

        if !response.status().is_success() {
            return Err(CoreError::Upstream(format!(
                "payment provider returned HTTP {} listing tools",
                response.status().as_u16()
            )));
        }

        let body: ToolListBody = response
            .json()
            .await
            .map_err(|e| CoreError::Upstream(format!("malformed payment tool list: {e}")))?;
        Ok(body.tools)
    }

    async fn invoke(
        &self,
        name: &str,
        arguments: serde_json::Value,
    ) -> Result<serde_json::Value, CoreError> {
        let url = format!("{}/tools/{name}", self.base_url);
        tracing::debug!(tool = name, "Invoking payment tool");

        let response = self
            .authorize(self.client.post(&url))
            .json(&arguments)
            .send()
            .await
            .map_err(|e| CoreError::Upstream(format!("payment provider unreachable: {e}")))?;

        if !response.status().is_success() {
            return Err(CoreError::Upstream(format!(
                "payment tool '{name}' returned HTTP {}",
                response.status().as_u16()
            )));
        }

        response
            .json()
            .await
            .map_err(|e| CoreError::Upstream(format!("malformed payment tool response: {e}")))
    }
}
