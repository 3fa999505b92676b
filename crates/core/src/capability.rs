//! Capability kinds and the injectable capability configuration.
//!
//! The original deployment hardcoded service→endpoint globals; here the
//! mapping is configuration, validated once at startup, and threaded
//! into the synthesizers and the payment loop.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::webhook::is_http_url;

// ---------------------------------------------------------------------------
// CapabilityKind
// ---------------------------------------------------------------------------

/// The statically known capability provider kinds.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, schemars::JsonSchema,
)]
#[serde(rename_all = "lowercase")]
pub enum CapabilityKind {
    /// Web-search style provider: one free-text query per call.
    Search,
    /// News/recap style provider: one named parameter per call.
    News,
}

impl CapabilityKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            CapabilityKind::Search => "search",
            CapabilityKind::News => "news",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "search" => Some(CapabilityKind::Search),
            "news" => Some(CapabilityKind::News),
            _ => None,
        }
    }

    /// All known kinds, in registration order.
    pub fn all() -> &'static [CapabilityKind] {
        &[CapabilityKind::Search, CapabilityKind::News]
    }
}

impl std::fmt::Display for CapabilityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Invocation style
// ---------------------------------------------------------------------------

/// How a capability endpoint is invoked. Data, not code: the payment
/// loop turns this into an actual HTTP request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "style")]
pub enum InvocationStyle {
    /// POST a JSON body carrying a free-text `query`.
    Query,
    /// GET with a single `?{name}={value}` query parameter.
    Parameter {
        /// Default parameter name when the caller does not override it.
        name: String,
    },
}

// ---------------------------------------------------------------------------
// Capability configuration
// ---------------------------------------------------------------------------

/// One configured capability endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CapabilityEndpoint {
    pub kind: CapabilityKind,
    /// Base URL the capability is invoked at.
    pub endpoint: String,
    /// HTTP method, `"GET"` or `"POST"`.
    pub method: String,
    pub invocation: InvocationStyle,
    /// Price per call in USD, used as prompt material for planning.
    pub price_per_call: f64,
}

/// The full capability-kind → endpoint mapping.
///
/// Built once at startup (from env or tests) and validated before any
/// synthesizer or payment loop sees it.
#[derive(Debug, Clone)]
pub struct CapabilityConfig {
    entries: Vec<CapabilityEndpoint>,
}

impl CapabilityConfig {
    /// Build a config from explicit entries. Call [`validate`](Self::validate)
    /// before use.
    pub fn new(entries: Vec<CapabilityEndpoint>) -> Self {
        Self { entries }
    }

    /// Look up the endpoint for a capability kind.
    pub fn get(&self, kind: CapabilityKind) -> Option<&CapabilityEndpoint> {
        self.entries.iter().find(|e| e.kind == kind)
    }

    /// All configured entries, in registration order.
    pub fn entries(&self) -> &[CapabilityEndpoint] {
        &self.entries
    }

    /// Kinds with a configured endpoint, in registration order.
    pub fn kinds(&self) -> impl Iterator<Item = CapabilityKind> + '_ {
        self.entries.iter().map(|e| e.kind)
    }

    /// Startup validation: every entry must carry a parseable HTTP(S)
    /// URL, a positive price, a known method, and kinds must be unique.
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.entries.is_empty() {
            return Err(CoreError::Validation(
                "capability config must register at least one capability".into(),
            ));
        }
        for entry in &self.entries {
            if !is_http_url(&entry.endpoint) {
                return Err(CoreError::Validation(format!(
                    "capability '{}' has invalid endpoint '{}'",
                    entry.kind, entry.endpoint
                )));
            }
            if entry.price_per_call <= 0.0 {
                return Err(CoreError::Validation(format!(
                    "capability '{}' must have a positive price per call",
                    entry.kind
                )));
            }
            if entry.method != "GET" && entry.method != "POST" {
                return Err(CoreError::Validation(format!(
                    "capability '{}' has unsupported method '{}'",
                    entry.kind, entry.method
                )));
            }
        }
        for (i, entry) in self.entries.iter().enumerate() {
            if self.entries[..i].iter().any(|e| e.kind == entry.kind) {
                return Err(CoreError::Validation(format!(
                    "capability '{}' is registered twice",
                    entry.kind
                )));
            }
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
