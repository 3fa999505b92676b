//! Structured-generation oracle client.
//!
//! The oracle is a black box consulted for relevance judgments, plan
//! synthesis, proposal selection, and payment-loop decisions. The
//! contract is narrow: a prompt plus a JSON output schema in, a
//! schema-conformant JSON object (plus token usage) out. Transport
//! failures surface as upstream errors.

mod http;

pub use http::HttpOracle;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use tendermill_core::error::CoreError;

// ---------------------------------------------------------------------------
// Error
// ---------------------------------------------------------------------------

/// Errors from talking to the oracle.
#[derive(Debug, thiserror::Error)]
pub enum OracleError {
    /// The request never completed (network, DNS, timeout).
    #[error("Oracle request failed: {0}")]
    Connection(String),

    /// The oracle answered with a non-2xx status.
    #[error("Oracle returned HTTP {status}: {body}")]
    Http { status: u16, body: String },

    /// The response did not conform to the requested schema.
    #[error("Oracle broke its output contract: {0}")]
    Contract(String),
}

impl From<OracleError> for CoreError {
    fn from(err: OracleError) -> Self {
        CoreError::Upstream(err.to_string())
    }
}

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// A structured-generation request: prompt text plus the JSON schema
/// the response object must conform to.
#[derive(Debug, Clone, Serialize)]
pub struct GenerateRequest {
    pub prompt: String,
    pub schema: serde_json::Value,
}

impl GenerateRequest {
    pub fn new(prompt: impl Into<String>, schema: serde_json::Value) -> Self {
        Self {
            prompt: prompt.into(),
            schema,
        }
    }

    /// Build a request whose output schema is derived from `T`.
    pub fn for_type<T: schemars::JsonSchema>(prompt: impl Into<String>) -> Self {
        let root = schemars::gen::SchemaGenerator::default().into_root_schema_for::<T>();
        let schema =
            serde_json::to_value(root).expect("derived JSON schema always serializes");
        Self::new(prompt, schema)
    }
}

/// Token usage reported by the oracle for one generation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OracleUsage {
    #[serde(default)]
    pub prompt_tokens: u64,
    #[serde(default)]
    pub completion_tokens: u64,
}

impl OracleUsage {
    /// Fold another generation's usage into this aggregate.
    pub fn absorb(&mut self, other: OracleUsage) {
        self.prompt_tokens += other.prompt_tokens;
        self.completion_tokens += other.completion_tokens;
    }

    pub fn total_tokens(&self) -> u64 {
        self.prompt_tokens + self.completion_tokens
    }
}

/// A structured-generation response.
#[derive(Debug, Clone, Deserialize)]
pub struct GenerateResponse {
    /// The schema-conformant object.
    pub object: serde_json::Value,
    /// Token usage for this generation, when the oracle reports it.
    #[serde(default)]
    pub usage: OracleUsage,
}

impl GenerateResponse {
    /// Decode the response object into a typed value.
    ///
    /// A decode failure means the oracle broke its contract and maps to
    /// [`OracleError::Contract`].
    pub fn decode<T: DeserializeOwned>(&self) -> Result<T, OracleError> {
        serde_json::from_value(self.object.clone())
            .map_err(|e| OracleError::Contract(e.to_string()))
    }
}

// ---------------------------------------------------------------------------
// Oracle trait
// ---------------------------------------------------------------------------

/// External decision/generation service.
///
/// Production uses [`HttpOracle`]; tests script this seam directly.
#[async_trait]
pub trait Oracle: Send + Sync {
    async fn generate(&self, request: GenerateRequest) -> Result<GenerateResponse, OracleError>;
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
