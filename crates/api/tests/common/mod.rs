//! Shared integration-test harness: in-memory state, scripted
//! collaborators, and request helpers.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, Response, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use tower::ServiceExt;

use tendermill_api::config::ServerConfig;
use tendermill_api::router::build_app_router;
use tendermill_api::state::AppState;
use tendermill_core::capability::{
    CapabilityConfig, CapabilityEndpoint, CapabilityKind, InvocationStyle,
};
use tendermill_core::error::CoreError;
use tendermill_core::task::{TaskStatus, TaskTracker};
use tendermill_events::WebhookNotifier;
use tendermill_oracle::{GenerateRequest, GenerateResponse, Oracle, OracleError, OracleUsage};
use tendermill_payment::{PaymentTool, PaymentToolProvider};
use tendermill_store::MemoryStore;

// ---------------------------------------------------------------------------
// Scripted oracle
// ---------------------------------------------------------------------------

/// Oracle stand-in replaying scripted responses in order.
#[derive(Default)]
pub struct MockOracle {
    responses: Mutex<VecDeque<serde_json::Value>>,
    calls: AtomicUsize,
}

#[allow(dead_code)]
impl MockOracle {
    /// An oracle that fails every call; for tests that never reach it.
    pub fn unreachable() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn scripted(responses: Vec<serde_json::Value>) -> Arc<Self> {
        Arc::new(Self {
            responses: Mutex::new(responses.into()),
            calls: AtomicUsize::new(0),
        })
    }

    /// Queue one more response after construction.
    pub fn push(&self, response: serde_json::Value) {
        self.responses.lock().unwrap().push_back(response);
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Oracle for MockOracle {
    async fn generate(&self, _request: GenerateRequest) -> Result<GenerateResponse, OracleError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let object = self
            .responses
            .lock()
            .unwrap()
            .pop_front()
            .ok_or_else(|| OracleError::Connection("oracle script exhausted".into()))?;
        Ok(GenerateResponse {
            object,
            usage: OracleUsage {
                prompt_tokens: 10,
                completion_tokens: 5,
            },
        })
    }
}

/// Oracle that routes each request by its output schema, so concurrent
/// synthesizers and the payment loop can share one instance. Built for
/// the end-to-end scenario.
pub struct RoutingOracle {
    /// Relevance verdicts per prompt marker: `(marker, is_relevant, reasoning)`.
    pub relevance: Vec<(&'static str, bool, &'static str)>,
    /// Plan object returned for plan-synthesis requests.
    pub plan: serde_json::Value,
    /// Queue of payment-loop decisions.
    pub decisions: Mutex<VecDeque<serde_json::Value>>,
}

#[async_trait]
impl Oracle for RoutingOracle {
    async fn generate(&self, request: GenerateRequest) -> Result<GenerateResponse, OracleError> {
        let properties = &request.schema["properties"];
        let object = if properties.get("isRelevant").is_some() {
            let (_, relevant, reasoning) = self
                .relevance
                .iter()
                .find(|(marker, _, _)| request.prompt.contains(marker))
                .ok_or_else(|| {
                    OracleError::Contract("no relevance verdict for this prompt".into())
                })?;
            serde_json::json!({ "isRelevant": relevant, "reasoning": reasoning })
        } else if properties.get("totalEstimatedCost").is_some() {
            self.plan.clone()
        } else if properties.get("action").is_some() {
            self.decisions
                .lock()
                .unwrap()
                .pop_front()
                .ok_or_else(|| OracleError::Connection("decision script exhausted".into()))?
        } else {
            return Err(OracleError::Contract(format!(
                "unexpected schema: {}",
                request.schema
            )));
        };
        Ok(GenerateResponse {
            object,
            usage: OracleUsage::default(),
        })
    }
}

// ---------------------------------------------------------------------------
// Stub payment provider
// ---------------------------------------------------------------------------

pub struct StubProvider {
    pub reachable: bool,
    pub credential: &'static str,
    invocations: AtomicUsize,
}

#[allow(dead_code)]
impl StubProvider {
    pub fn new(credential: &'static str) -> Arc<Self> {
        Arc::new(Self {
            reachable: true,
            credential,
            invocations: AtomicUsize::new(0),
        })
    }

    pub fn unreachable() -> Arc<Self> {
        Arc::new(Self {
            reachable: false,
            credential: "",
            invocations: AtomicUsize::new(0),
        })
    }

    pub fn invocation_count(&self) -> usize {
        self.invocations.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl PaymentToolProvider for StubProvider {
    async fn list_tools(&self) -> Result<Vec<PaymentTool>, CoreError> {
        if !self.reachable {
            return Err(CoreError::Upstream("payment provider unreachable".into()));
        }
        Ok(vec![PaymentTool {
            name: "send_payment".into(),
            description: "Send a payment for a 402 challenge".into(),
            input_schema: None,
        }])
    }

    async fn invoke(
        &self,
        _name: &str,
        _arguments: serde_json::Value,
    ) -> Result<serde_json::Value, CoreError> {
        self.invocations.fetch_add(1, Ordering::SeqCst);
        Ok(serde_json::json!({ "paymentHeader": self.credential }))
    }
}

// ---------------------------------------------------------------------------
// App construction
// ---------------------------------------------------------------------------

/// Everything a test needs to drive the app and inspect its state.
pub struct TestApp {
    pub router: Router,
    pub store: Arc<MemoryStore>,
    pub tasks: Arc<TaskTracker>,
}

pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:3000".to_string()],
        request_timeout_secs: 30,
        oracle_url: "http://localhost:0".to_string(),
        oracle_api_key: None,
        payment_provider_url: "http://localhost:0".to_string(),
        payment_provider_api_key: None,
    }
}

/// Two-capability configuration pointing at unroutable endpoints;
/// tests that exercise real capability calls pass their own.
pub fn test_capabilities() -> CapabilityConfig {
    CapabilityConfig::new(vec![
        CapabilityEndpoint {
            kind: CapabilityKind::Search,
            endpoint: "http://127.0.0.1:1/search".into(),
            method: "POST".into(),
            invocation: InvocationStyle::Query,
            price_per_call: 0.01,
        },
        CapabilityEndpoint {
            kind: CapabilityKind::News,
            endpoint: "http://127.0.0.1:1/news".into(),
            method: "GET".into(),
            invocation: InvocationStyle::Parameter {
                name: "feed_categories".into(),
            },
            price_per_call: 0.01,
        },
    ])
}

/// Build the full application with the production middleware stack over
/// scripted collaborators and a fresh in-memory store.
pub fn build_test_app(
    oracle: Arc<dyn Oracle>,
    provider: Arc<dyn PaymentToolProvider>,
    capabilities: CapabilityConfig,
) -> TestApp {
    let config = test_config();
    let store = Arc::new(MemoryStore::new());
    let tasks = Arc::new(TaskTracker::new());

    let state = AppState {
        tenders: store.clone(),
        proposals: store.clone(),
        webhooks: store.clone(),
        oracle,
        notifier: Arc::new(WebhookNotifier::new()),
        payment_provider: provider,
        capabilities,
        config: Arc::new(config.clone()),
        tasks: Arc::clone(&tasks),
    };

    TestApp {
        router: build_app_router(state, &config),
        store,
        tasks,
    }
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

pub async fn get(app: &Router, path: &str) -> Response<Body> {
    app.clone()
        .oneshot(
            Request::builder()
                .uri(path)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap()
}

pub async fn post_json(app: &Router, path: &str, body: serde_json::Value) -> Response<Body> {
    app.clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(path)
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap()
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

/// Assert status and decode the body in one step.
#[allow(dead_code)]
pub async fn expect_json(response: Response<Body>, status: StatusCode) -> serde_json::Value {
    assert_eq!(response.status(), status);
    body_json(response).await
}

/// Wait until every tracked background task reaches a terminal status.
#[allow(dead_code)]
pub async fn settle_background(tasks: &TaskTracker) {
    for _ in 0..200 {
        let snapshot = tasks.snapshot();
        if !snapshot.is_empty() && snapshot.iter().all(|t| t.status != TaskStatus::Pending) {
            return;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    panic!("background tasks did not settle in time");
}
