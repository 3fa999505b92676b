//! Routes for the `/proposals` resource.
//!
//! The synthesizers persist through the store directly; this surface
//! exists for external sellers submitting proposals of their own, with
//! the same invariants enforced.

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};

use tendermill_core::proposal::{NewProposal, Proposal};
use tendermill_core::types::EntityId;

use crate::error::AppResult;
use crate::state::AppState;

/// Routes mounted at `/proposals`.
///
/// ```text
/// GET    /    -> list_proposals (?tenderId=)
/// POST   /    -> submit_proposal
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/", get(list_proposals).post(submit_proposal))
}

#[derive(Serialize)]
struct ProposalResponse {
    proposal: Proposal,
}

/// POST /api/v1/proposals
///
/// Submit a proposal for an existing tender. 404 for an unknown
/// tender, 400 when the plan's declared total cost disagrees with its
/// step-price sum, 409 when the tender/capability pair already has a
/// proposal.
async fn submit_proposal(
    State(state): State<AppState>,
    Json(input): Json<NewProposal>,
) -> AppResult<impl IntoResponse> {
    let proposal = state.proposals.create(input).await?;
    tracing::info!(
        proposal_id = %proposal.id,
        tender_id = %proposal.tender_id,
        capability = %proposal.capability,
        "Proposal submitted"
    );
    Ok((StatusCode::CREATED, Json(ProposalResponse { proposal })))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ProposalQuery {
    tender_id: Option<EntityId>,
}

#[derive(Serialize)]
struct ProposalListResponse {
    proposals: Vec<Proposal>,
}

/// GET /api/v1/proposals -- all proposals, or those of one tender.
async fn list_proposals(
    State(state): State<AppState>,
    Query(query): Query<ProposalQuery>,
) -> AppResult<Json<ProposalListResponse>> {
    let proposals = match query.tender_id {
        Some(tender_id) => state.proposals.find_by_tender(tender_id).await?,
        None => state.proposals.list().await?,
    };
    Ok(Json(ProposalListResponse { proposals }))
}
