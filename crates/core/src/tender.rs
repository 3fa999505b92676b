//! Tender types: a structured request-for-proposal.
//!
//! Tenders are immutable after creation; the whole lifecycle is
//! create-once, read-many. Wire names are camelCase to match the
//! published webhook payload format.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::types::{new_id, EntityId};

/// Default title when the caller does not supply one.
pub const UNTITLED_TENDER: &str = "Untitled Tender";

fn default_title() -> String {
    UNTITLED_TENDER.to_string()
}

// ---------------------------------------------------------------------------
// Tender
// ---------------------------------------------------------------------------

/// A structured request-for-proposal. Immutable after creation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tender {
    pub id: EntityId,
    /// Display title. Local-only: broadcast payloads omit it, so
    /// deserializing a wire tender falls back to the default.
    #[serde(default = "default_title")]
    pub title: String,
    /// The pain point or issue that needs to be solved.
    pub problem: String,
    /// What success looks like.
    pub desired_outcome: String,
    /// Ordered list of limitations or requirements.
    pub constraints: Vec<String>,
    /// How submissions will be judged.
    pub evaluation_criteria: Vec<EvaluationCriterion>,
    /// Required delivery format for the winning proposal.
    pub submission_format: SubmissionFormat,
    pub created_at: DateTime<Utc>,
}

/// One weighted judging criterion.
#[derive(Debug, Clone, Serialize, Deserialize, schemars::JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct EvaluationCriterion {
    pub criterion: String,
    pub weight: String,
}

/// How the selected proposal should deliver its result.
#[derive(Debug, Clone, Default, Serialize, Deserialize, schemars::JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionFormat {
    /// Submission endpoint or agent handle, used for downstream routing.
    pub endpoint: Option<String>,
    /// Expected output format for a test case.
    pub sample_output: Option<String>,
    /// Expected pricing structure.
    pub price_per_call: Option<String>,
}

// ---------------------------------------------------------------------------
// NewTender
// ---------------------------------------------------------------------------

/// Input for creating a tender. Missing optional fields get defaults.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTender {
    pub title: Option<String>,
    pub problem: String,
    pub desired_outcome: String,
    #[serde(default)]
    pub constraints: Vec<String>,
    #[serde(default)]
    pub evaluation_criteria: Vec<EvaluationCriterion>,
    pub submission_format: Option<SubmissionFormat>,
}

impl NewTender {
    /// Reject requests missing the two required free-text fields.
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.problem.trim().is_empty() || self.desired_outcome.trim().is_empty() {
            return Err(CoreError::Validation(
                "Problem and desired outcome are required".into(),
            ));
        }
        Ok(())
    }

    /// Materialize the tender with a fresh id and timestamp.
    pub fn into_tender(self) -> Tender {
        Tender {
            id: new_id(),
            title: self
                .title
                .filter(|t| !t.trim().is_empty())
                .unwrap_or_else(|| UNTITLED_TENDER.to_string()),
            problem: self.problem,
            desired_outcome: self.desired_outcome,
            constraints: self.constraints,
            evaluation_criteria: self.evaluation_criteria,
            submission_format: self.submission_format.unwrap_or_default(),
            created_at: Utc::now(),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn new_tender(problem: &str, outcome: &str) -> NewTender {
        NewTender {
            title: None,
            problem: problem.to_string(),
            desired_outcome: outcome.to_string(),
            constraints: vec![],
            evaluation_criteria: vec![],
            submission_format: None,
        }
    }

    #[test]
    fn validate_rejects_empty_problem() {
        let input = new_tender("  ", "weekly digest");
        assert!(matches!(
            input.validate(),
            Err(CoreError::Validation(_))
        ));
    }

    #[test]
    fn validate_rejects_empty_desired_outcome() {
        let input = new_tender("need news", "");
        assert!(input.validate().is_err());
    }

    #[test]
    fn into_tender_defaults_title_and_format() {
        let tender = new_tender("need news", "weekly digest").into_tender();
        assert_eq!(tender.title, UNTITLED_TENDER);
        assert!(tender.submission_format.endpoint.is_none());
        assert!(tender.constraints.is_empty());
    }

    #[test]
    fn wire_tender_without_title_deserializes_with_the_default() {
        let tender: Tender = serde_json::from_value(serde_json::json!({
            "id": crate::types::new_id(),
            "problem": "need weekly biotech news digest",
            "desiredOutcome": "a digest",
            "constraints": [],
            "evaluationCriteria": [],
            "submissionFormat": {},
            "createdAt": "2026-08-24T00:00:00Z"
        }))
        .unwrap();
        assert_eq!(tender.title, UNTITLED_TENDER);
    }

    #[test]
    fn tender_serializes_with_camel_case_wire_names() {
        let tender = new_tender("p", "o").into_tender();
        let json = serde_json::to_value(&tender).unwrap();
        assert!(json.get("desiredOutcome").is_some());
        assert!(json.get("evaluationCriteria").is_some());
        assert!(json.get("submissionFormat").is_some());
        assert!(json.get("createdAt").is_some());
    }
}
