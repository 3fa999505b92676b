//! Route for proposal evaluation.

use std::sync::Arc;

use axum::extract::State;
use axum::routing::post;
use axum::{Json, Router};
use serde::Deserialize;

use tendermill_core::types::EntityId;
use tendermill_engine::{Evaluation, Selector};

use crate::error::AppResult;
use crate::state::AppState;

/// Routes mounted at `/evaluate`.
pub fn router() -> Router<AppState> {
    Router::new().route("/", post(evaluate))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct EvaluateRequest {
    tender_id: EntityId,
}

/// POST /api/v1/evaluate
///
/// Select the best proposal for a tender. 404 for an unknown tender,
/// 409 when it has no proposals, 502 when the oracle fails or breaks
/// its contract.
async fn evaluate(
    State(state): State<AppState>,
    Json(input): Json<EvaluateRequest>,
) -> AppResult<Json<Evaluation>> {
    let selector = Selector::new(
        Arc::clone(&state.oracle),
        Arc::clone(&state.tenders),
        Arc::clone(&state.proposals),
    );
    let evaluation = selector.evaluate(input.tender_id).await?;
    Ok(Json(evaluation))
}
