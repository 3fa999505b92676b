//! Route for the payment-required retry loop.

use std::sync::Arc;

use axum::extract::State;
use axum::routing::post;
use axum::{Json, Router};

use tendermill_payment::{PaymentLoop, PaymentOutcome, PaymentRequest};

use crate::error::AppResult;
use crate::state::AppState;

/// Routes mounted at `/pay`.
pub fn router() -> Router<AppState> {
    Router::new().route("/", post(pay))
}

/// POST /api/v1/pay
///
/// Call a capability, paying through the provider if challenged with a
/// 402. 400 for an unknown service, 502 when the oracle or the payment
/// provider is unreachable. An unresolved 402 within the step budget is
/// a 200 with `success: false`.
async fn pay(
    State(state): State<AppState>,
    Json(request): Json<PaymentRequest>,
) -> AppResult<Json<PaymentOutcome>> {
    let runner = PaymentLoop::new(
        Arc::clone(&state.oracle),
        Arc::clone(&state.payment_provider),
        state.capabilities.clone(),
    );
    let outcome = runner.run(request).await?;
    Ok(Json(outcome))
}
