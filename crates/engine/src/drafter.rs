//! Tender drafting: turn a free-text request into a structured tender.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use tendermill_core::error::CoreError;
use tendermill_core::tender::{EvaluationCriterion, SubmissionFormat};
use tendermill_oracle::{GenerateRequest, Oracle};

use crate::prompts;

/// A drafted tender, ready for review. Not persisted; the caller
/// decides whether to submit it.
#[derive(Debug, Clone, Serialize, Deserialize, schemars::JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct DraftTender {
    /// The pain point or issue that needs to be solved.
    pub problem: String,
    /// What success looks like.
    pub desired_outcome: String,
    /// Limitations or requirements (budget, time, etc).
    pub constraints: Vec<String>,
    /// How submissions will be evaluated.
    pub evaluation_criteria: Vec<EvaluationCriterion>,
    pub submission_format: SubmissionFormat,
}

/// Oracle-backed tender drafter.
pub struct TenderDrafter {
    oracle: Arc<dyn Oracle>,
}

impl TenderDrafter {
    pub fn new(oracle: Arc<dyn Oracle>) -> Self {
        Self { oracle }
    }

    /// Draft a structured tender from a free-text request.
    pub async fn draft(&self, request_text: &str) -> Result<DraftTender, CoreError> {
        if request_text.trim().is_empty() {
            return Err(CoreError::Validation("Tender request is required".into()));
        }

        let draft: DraftTender = self
            .oracle
            .generate(GenerateRequest::for_type::<DraftTender>(prompts::draft(
                request_text,
            )))
            .await
            .map_err(CoreError::from)?
            .decode()
            .map_err(CoreError::from)?;

        Ok(draft)
    }
}
