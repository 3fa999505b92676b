//! Evaluation selector: choose the best proposal for a tender.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use tendermill_core::error::CoreError;
use tendermill_core::types::EntityId;
use tendermill_oracle::{GenerateRequest, Oracle};
use tendermill_store::{ProposalStore, TenderStore};

use crate::prompts;

/// Fixed reasoning when a tender has exactly one proposal.
pub const SINGLE_PROPOSAL_REASONING: &str = "Only one proposal submitted";

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Oracle output schema for multi-proposal selection.
#[derive(Debug, Clone, Serialize, Deserialize, schemars::JsonSchema)]
#[serde(rename_all = "camelCase")]
struct SelectionVerdict {
    /// The ID of the best proposal. Must be one of the supplied IDs.
    selected_proposal_id: String,
    /// Brief explanation of why this proposal was chosen.
    reasoning: String,
}

/// Result of evaluating a tender's proposals.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Evaluation {
    pub selected_proposal_id: EntityId,
    pub reasoning: String,
    /// The tender's submission endpoint, for downstream routing.
    pub endpoint: Option<String>,
}

// ---------------------------------------------------------------------------
// Selector
// ---------------------------------------------------------------------------

/// Chooses the best proposal for a tender from the proposal store.
pub struct Selector {
    oracle: Arc<dyn Oracle>,
    tenders: Arc<dyn TenderStore>,
    proposals: Arc<dyn ProposalStore>,
}

impl Selector {
    pub fn new(
        oracle: Arc<dyn Oracle>,
        tenders: Arc<dyn TenderStore>,
        proposals: Arc<dyn ProposalStore>,
    ) -> Self {
        Self {
            oracle,
            tenders,
            proposals,
        }
    }

    /// Evaluate the proposals for `tender_id` and select one.
    ///
    /// Fails `NotFound` for an unknown tender and `InvalidState` for a
    /// tender with zero proposals. With exactly one proposal the
    /// selection is deterministic and the oracle is never consulted.
    /// With two or more, the oracle chooses, and its answer is only
    /// accepted if the returned id belongs to this tender's proposal
    /// set.
    pub async fn evaluate(&self, tender_id: EntityId) -> Result<Evaluation, CoreError> {
        let tender = self
            .tenders
            .find(tender_id)
            .await?
            .ok_or(CoreError::NotFound {
                entity: "Tender",
                id: tender_id,
            })?;

        let proposals = self.proposals.find_by_tender(tender_id).await?;
        let endpoint = tender.submission_format.endpoint.clone();

        if proposals.is_empty() {
            return Err(CoreError::InvalidState(
                "No proposals to evaluate".into(),
            ));
        }

        if proposals.len() == 1 {
            return Ok(Evaluation {
                selected_proposal_id: proposals[0].id,
                reasoning: SINGLE_PROPOSAL_REASONING.to_string(),
                endpoint,
            });
        }

        let verdict: SelectionVerdict = self
            .oracle
            .generate(GenerateRequest::for_type::<SelectionVerdict>(
                prompts::selection(&tender, &proposals),
            ))
            .await
            .map_err(CoreError::from)?
            .decode()
            .map_err(CoreError::from)?;

        let selected_id: EntityId = verdict.selected_proposal_id.parse().map_err(|_| {
            CoreError::Upstream(format!(
                "oracle selected an unparseable proposal id '{}'",
                verdict.selected_proposal_id
            ))
        })?;

        // The oracle is not trusted to stay inside the candidate set.
        if !proposals.iter().any(|p| p.id == selected_id) {
            return Err(CoreError::Upstream(format!(
                "oracle selected proposal {selected_id}, which is not among this tender's proposals"
            )));
        }

        tracing::info!(
            tender_id = %tender_id,
            proposal_id = %selected_id,
            "Proposal selected"
        );
        Ok(Evaluation {
            selected_proposal_id: selected_id,
            reasoning: verdict.reasoning,
            endpoint,
        })
    }
}
