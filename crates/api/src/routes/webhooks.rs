//! Routes for the `/webhooks` resource: subscriber registration.
//!
//! Any registered URL is trusted; deliveries carry no signature.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};

use tendermill_core::webhook::Webhook;

use crate::error::AppResult;
use crate::state::AppState;

/// Routes mounted at `/webhooks`.
///
/// ```text
/// GET    /    -> list_webhooks
/// POST   /    -> register_webhook
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/", get(list_webhooks).post(register_webhook))
}

#[derive(Deserialize)]
struct RegisterWebhook {
    url: String,
}

/// POST /api/v1/webhooks
///
/// Register a subscriber URL. 400 on an unparsable URL, 201 with the
/// registration otherwise.
async fn register_webhook(
    State(state): State<AppState>,
    Json(input): Json<RegisterWebhook>,
) -> AppResult<impl IntoResponse> {
    let webhook = state.webhooks.register(&input.url).await?;
    tracing::info!(webhook_id = %webhook.id, url = %webhook.url, "Webhook registered");
    Ok((StatusCode::CREATED, Json(webhook)))
}

#[derive(Serialize)]
struct WebhookListResponse {
    webhooks: Vec<Webhook>,
}

/// GET /api/v1/webhooks -- list registrations, newest first.
async fn list_webhooks(State(state): State<AppState>) -> AppResult<Json<WebhookListResponse>> {
    let webhooks = state.webhooks.list().await?;
    Ok(Json(WebhookListResponse { webhooks }))
}
