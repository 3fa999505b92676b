//! The `tender.created` event payload.

use chrono::{DateTime, Utc};
use serde::Serialize;

use tendermill_core::tender::{EvaluationCriterion, SubmissionFormat, Tender};
use tendermill_core::types::EntityId;

/// Event name delivered to webhook subscribers.
pub const TENDER_CREATED: &str = "tender.created";

/// The tender fields published on the wire. Deliberately narrower than
/// [`Tender`]: the display title stays local and is not broadcast.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TenderPayload {
    pub id: EntityId,
    pub problem: String,
    pub desired_outcome: String,
    pub constraints: Vec<String>,
    pub evaluation_criteria: Vec<EvaluationCriterion>,
    pub submission_format: SubmissionFormat,
    pub created_at: DateTime<Utc>,
}

impl From<Tender> for TenderPayload {
    fn from(tender: Tender) -> Self {
        Self {
            id: tender.id,
            problem: tender.problem,
            desired_outcome: tender.desired_outcome,
            constraints: tender.constraints,
            evaluation_criteria: tender.evaluation_criteria,
            submission_format: tender.submission_format,
            created_at: tender.created_at,
        }
    }
}

/// Wire payload for a `tender.created` delivery.
///
/// Serializes to `{"event": "tender.created", "tender": {...}}` with
/// the tender's camelCase wire fields, including `createdAt`.
#[derive(Debug, Clone, Serialize)]
pub struct TenderCreated {
    pub event: &'static str,
    pub tender: TenderPayload,
}

impl TenderCreated {
    pub fn new(tender: Tender) -> Self {
        Self {
            event: TENDER_CREATED,
            tender: tender.into(),
        }
    }
}
