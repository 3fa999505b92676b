use std::sync::Arc;

use tendermill_core::capability::CapabilityConfig;
use tendermill_core::task::TaskTracker;
use tendermill_events::WebhookNotifier;
use tendermill_oracle::Oracle;
use tendermill_payment::PaymentToolProvider;
use tendermill_store::{ProposalStore, TenderStore, WebhookStore};

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via
/// `State<AppState>`.
///
/// Cheaply cloneable (everything is behind `Arc` or already `Clone`).
#[derive(Clone)]
pub struct AppState {
    pub tenders: Arc<dyn TenderStore>,
    pub proposals: Arc<dyn ProposalStore>,
    pub webhooks: Arc<dyn WebhookStore>,
    /// Structured-generation oracle shared by synthesis, selection,
    /// drafting, and the payment loop.
    pub oracle: Arc<dyn Oracle>,
    /// Webhook fan-out for `tender.created` events.
    pub notifier: Arc<WebhookNotifier>,
    /// Payment-tool provider client.
    pub payment_provider: Arc<dyn PaymentToolProvider>,
    /// Capability-kind → endpoint mapping, validated at startup.
    pub capabilities: CapabilityConfig,
    pub config: Arc<ServerConfig>,
    /// Registry of detached background tasks.
    pub tasks: Arc<TaskTracker>,
}
