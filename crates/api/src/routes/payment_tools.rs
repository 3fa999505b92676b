//! Route listing the payment provider's tools.

use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};
use serde::Serialize;

use tendermill_payment::PaymentTool;

use crate::error::AppResult;
use crate::state::AppState;

/// Routes mounted at `/payment-tools`.
pub fn router() -> Router<AppState> {
    Router::new().route("/", get(list_tools))
}

#[derive(Serialize)]
struct ToolListResponse {
    tools: Vec<PaymentTool>,
}

/// GET /api/v1/payment-tools
///
/// List the payment provider's tools. 502 when the provider is
/// unreachable.
async fn list_tools(State(state): State<AppState>) -> AppResult<Json<ToolListResponse>> {
    let tools = state.payment_provider.list_tools().await?;
    Ok(Json(ToolListResponse { tools }))
}
