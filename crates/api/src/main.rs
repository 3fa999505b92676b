use std::net::SocketAddr;
use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use tendermill_api::config::{capability_config_from_env, ServerConfig};
use tendermill_api::router::build_app_router;
use tendermill_api::state::AppState;
use tendermill_core::task::TaskTracker;
use tendermill_events::WebhookNotifier;
use tendermill_oracle::HttpOracle;
use tendermill_payment::HttpPaymentProvider;
use tendermill_store::MemoryStore;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // --- Tracing ---
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "tendermill_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // --- Configuration ---
    let config = ServerConfig::from_env();
    tracing::info!(host = %config.host, port = %config.port, "Loaded server configuration");

    let capabilities = capability_config_from_env().expect("Invalid capability configuration");
    tracing::info!(
        capabilities = capabilities.entries().len(),
        "Capability configuration validated"
    );

    // --- Collaborators ---
    let store = Arc::new(MemoryStore::new());
    let oracle = Arc::new(HttpOracle::new(
        config.oracle_url.clone(),
        config.oracle_api_key.clone(),
    ));
    let payment_provider = HttpPaymentProvider::new(
        config.payment_provider_url.clone(),
        config.payment_provider_api_key.clone(),
    )
    .expect("Failed to build payment provider client");

    // --- App state ---
    let state = AppState {
        tenders: store.clone(),
        proposals: store.clone(),
        webhooks: store,
        oracle,
        notifier: Arc::new(WebhookNotifier::new()),
        payment_provider: Arc::new(payment_provider),
        capabilities,
        config: Arc::new(config.clone()),
        tasks: Arc::new(TaskTracker::new()),
    };

    // --- Router ---
    let app = build_app_router(state, &config);

    // --- Start server ---
    let addr = SocketAddr::new(
        config.host.parse().expect("Invalid HOST address"),
        config.port,
    );
    tracing::info!(%addr, "Starting server");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");

    // In-flight detached tasks (webhook fan-outs, synthesizers) are
    // dropped at this point; that is the accepted best-effort tradeoff.
    tracing::info!("Graceful shutdown complete");
}

/// Wait for a termination signal to initiate graceful shutdown.
///
/// Handles both SIGINT (Ctrl-C) and SIGTERM (on Unix) so the server
/// shuts down cleanly whether stopped interactively or by a process
/// manager.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl-C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => tracing::info!("Received Ctrl-C, shutting down"),
        _ = terminate => tracing::info!("Received SIGTERM, shutting down"),
    }
}
