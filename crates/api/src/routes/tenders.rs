//! Routes for the `/tenders` resource: creation (with detached
//! fan-out and synthesis), listing, and oracle-backed drafting.

use std::sync::Arc;

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};

use tendermill_core::tender::{NewTender, Tender};
use tendermill_core::types::EntityId;
use tendermill_engine::{CapabilityProfile, DraftTender, Synthesizer, TenderDrafter};

use crate::error::{AppError, AppResult};
use crate::state::AppState;

/// Routes mounted at `/tenders`.
///
/// ```text
/// GET    /            -> list_tenders (?id= fetches one as a list)
/// POST   /            -> create_tender
/// POST   /generate    -> generate_tender
/// POST   /events      -> receive_tender_event
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_tenders).post(create_tender))
        .route("/generate", post(generate_tender))
        .route("/events", post(receive_tender_event))
}

// ---------------------------------------------------------------------------
// Create
// ---------------------------------------------------------------------------

#[derive(Serialize)]
struct TenderResponse {
    tender: Tender,
}

/// POST /api/v1/tenders
///
/// Create a tender and return it immediately. Webhook fan-out and one
/// proposal synthesizer per configured capability run as detached,
/// tracked tasks; the response never reflects their outcomes.
async fn create_tender(
    State(state): State<AppState>,
    Json(input): Json<NewTender>,
) -> AppResult<impl IntoResponse> {
    input.validate()?;
    let tender = state.tenders.create(input.into_tender()).await?;

    tracing::info!(tender_id = %tender.id, title = %tender.title, "Tender created");
    spawn_tender_pipeline(&state, &tender);

    Ok((StatusCode::CREATED, Json(TenderResponse { tender })))
}

/// Detach the post-creation work: webhook notification plus one
/// synthesizer per configured capability, all through the task tracker
/// so failures are logged and observable but never reach the caller.
fn spawn_tender_pipeline(state: &AppState, tender: &Tender) {
    let notifier = Arc::clone(&state.notifier);
    let webhooks = Arc::clone(&state.webhooks);
    let notify_tender = tender.clone();
    state.tasks.spawn(
        format!("notify-webhooks-{}", tender.id),
        async move {
            let hooks = webhooks.list().await?;
            notifier.notify_all(&hooks, &notify_tender).await;
            Ok(())
        },
    );

    spawn_synthesizers(state, tender);
}

/// Detach one synthesizer per configured capability.
fn spawn_synthesizers(state: &AppState, tender: &Tender) {
    for kind in state.capabilities.kinds() {
        // The config is validated at startup, so every advertised kind
        // resolves to a profile.
        let profile = match CapabilityProfile::from_config(&state.capabilities, kind) {
            Ok(profile) => profile,
            Err(e) => {
                tracing::error!(capability = %kind, error = %e, "Skipping unconfigured capability");
                continue;
            }
        };
        let synthesizer = Synthesizer::new(
            profile,
            Arc::clone(&state.oracle),
            Arc::clone(&state.proposals),
        );
        let tender = tender.clone();
        state.tasks.spawn(
            format!("synthesize-{kind}-{}", tender.id),
            async move { synthesizer.run(&tender).await.map(|_| ()) },
        );
    }
}

// ---------------------------------------------------------------------------
// List
// ---------------------------------------------------------------------------

#[derive(Deserialize)]
struct TenderQuery {
    id: Option<EntityId>,
}

/// One tender plus how many proposals it has attracted.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct TenderSummary {
    #[serde(flatten)]
    tender: Tender,
    proposal_count: usize,
}

#[derive(Serialize)]
struct TenderListResponse {
    tenders: Vec<TenderSummary>,
}

/// GET /api/v1/tenders
///
/// List all tenders newest first, or with `?id=` fetch one tender
/// as a one-element list (empty when unknown).
async fn list_tenders(
    State(state): State<AppState>,
    Query(query): Query<TenderQuery>,
) -> AppResult<Json<TenderListResponse>> {
    let tenders = match query.id {
        Some(id) => state.tenders.find(id).await?.into_iter().collect(),
        None => state.tenders.list().await?,
    };

    let mut summaries = Vec::with_capacity(tenders.len());
    for tender in tenders {
        let proposal_count = state.proposals.find_by_tender(tender.id).await?.len();
        summaries.push(TenderSummary {
            tender,
            proposal_count,
        });
    }

    Ok(Json(TenderListResponse { tenders: summaries }))
}

// ---------------------------------------------------------------------------
// Generate
// ---------------------------------------------------------------------------

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateTenderRequest {
    tender_request: String,
}

#[derive(Serialize)]
struct GenerateTenderResponse {
    tender: DraftTender,
}

/// POST /api/v1/tenders/generate
///
/// Draft a structured tender from free text. The draft is returned for
/// review, never persisted.
async fn generate_tender(
    State(state): State<AppState>,
    Json(input): Json<GenerateTenderRequest>,
) -> AppResult<Json<GenerateTenderResponse>> {
    let drafter = TenderDrafter::new(Arc::clone(&state.oracle));
    let tender = drafter.draft(&input.tender_request).await?;
    Ok(Json(GenerateTenderResponse { tender }))
}

// ---------------------------------------------------------------------------
// Receive
// ---------------------------------------------------------------------------

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct TenderEventResponse {
    message: &'static str,
    tender_id: EntityId,
    status: &'static str,
}

/// POST /api/v1/tenders/events
///
/// Receive a `tender.created` event broadcast by another instance. The
/// tender must carry its own id; an event without one is rejected
/// before any background work starts. The tender is stored as-is and
/// the synthesizers are detached, but nothing is re-broadcast to our
/// own webhook subscribers.
async fn receive_tender_event(
    State(state): State<AppState>,
    Json(payload): Json<serde_json::Value>,
) -> AppResult<impl IntoResponse> {
    let Some(tender_value) = payload.get("tender").filter(|t| !t["id"].is_null()) else {
        return Err(AppError::BadRequest(
            "Invalid webhook payload: missing tender data".into(),
        ));
    };
    let tender: Tender = serde_json::from_value(tender_value.clone())
        .map_err(|e| AppError::BadRequest(format!("Invalid tender in webhook payload: {e}")))?;

    let tender = state.tenders.create(tender).await?;
    tracing::info!(tender_id = %tender.id, "Tender event received, processing started");
    spawn_synthesizers(&state, &tender);

    Ok(Json(TenderEventResponse {
        message: "Tender received and processing started",
        tender_id: tender.id,
        status: "processing",
    }))
}
