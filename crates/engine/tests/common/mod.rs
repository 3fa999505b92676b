//! Shared test fixtures: a scripted oracle and domain builders.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use tendermill_core::capability::{
    CapabilityConfig, CapabilityEndpoint, CapabilityKind, InvocationStyle,
};
use tendermill_core::tender::{NewTender, Tender};
use tendermill_oracle::{GenerateRequest, GenerateResponse, Oracle, OracleError, OracleUsage};

/// Oracle stand-in that replays scripted responses in order.
///
/// Exists so no test ever talks to a real generation service; the
/// `Oracle` trait is the seam.
#[derive(Default)]
pub struct MockOracle {
    responses: Mutex<VecDeque<Result<GenerateResponse, OracleError>>>,
    calls: AtomicUsize,
}

impl MockOracle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a successful generation returning `object`.
    pub fn push_object(&self, object: serde_json::Value) {
        self.responses
            .lock()
            .unwrap()
            .push_back(Ok(GenerateResponse {
                object,
                usage: OracleUsage {
                    prompt_tokens: 10,
                    completion_tokens: 5,
                },
            }));
    }

    /// Queue a connection failure.
    pub fn push_error(&self, message: &str) {
        self.responses
            .lock()
            .unwrap()
            .push_back(Err(OracleError::Connection(message.to_string())));
    }

    /// How many generations were requested so far.
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Oracle for MockOracle {
    async fn generate(&self, _request: GenerateRequest) -> Result<GenerateResponse, OracleError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(OracleError::Connection("mock oracle script exhausted".into())))
    }
}

/// Standard two-capability configuration used across tests.
pub fn capability_config() -> CapabilityConfig {
    CapabilityConfig::new(vec![
        CapabilityEndpoint {
            kind: CapabilityKind::Search,
            endpoint: "https://api.search.example/v1/search".into(),
            method: "POST".into(),
            invocation: InvocationStyle::Query,
            price_per_call: 0.01,
        },
        CapabilityEndpoint {
            kind: CapabilityKind::News,
            endpoint: "https://api.news.example/news".into(),
            method: "GET".into(),
            invocation: InvocationStyle::Parameter {
                name: "feed_categories".into(),
            },
            price_per_call: 0.01,
        },
    ])
}

/// A tender asking for a weekly biotech news digest.
pub fn biotech_tender() -> Tender {
    NewTender {
        title: Some("Biotech digest".into()),
        problem: "need weekly biotech news digest".into(),
        desired_outcome: "a weekly digest of biotech headlines".into(),
        constraints: vec!["budget under $1 per week".into()],
        evaluation_criteria: vec![],
        submission_format: None,
    }
    .into_tender()
}

/// A one-step parameterized news plan as the oracle would emit it.
pub fn news_plan_json(price: f64, total: f64) -> serde_json::Value {
    serde_json::json!({
        "steps": [{
            "stepNumber": 1,
            "action": "Fetch biotech feed categories",
            "apiCall": {
                "endpoint": "https://api.news.example/news",
                "method": "GET",
                "parameter": { "name": "feed_categories", "value": "biotech" }
            },
            "pricePerCall": price
        }],
        "totalEstimatedCost": total,
        "expectedOutcome": "A list of recent biotech news articles"
    })
}
