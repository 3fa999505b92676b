//! Capability relevance & plan synthesizer.
//!
//! One [`Synthesizer`] per capability kind. Given a tender it runs the
//! three-stage pipeline: relevance gate, plan synthesis, persist. The
//! pipeline is designed to run detached: callers spawn it through a
//! task tracker, which logs failures and never lets them reach the
//! triggering request.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use tendermill_core::error::CoreError;
use tendermill_core::proposal::{NewProposal, Plan};
use tendermill_core::tender::Tender;
use tendermill_core::types::EntityId;
use tendermill_oracle::{GenerateRequest, Oracle};
use tendermill_store::ProposalStore;

use crate::profile::CapabilityProfile;
use crate::prompts;

// ---------------------------------------------------------------------------
// Oracle output schemas
// ---------------------------------------------------------------------------

/// Relevance-gate verdict returned by the oracle.
#[derive(Debug, Clone, Serialize, Deserialize, schemars::JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct RelevanceVerdict {
    /// Whether this capability can help solve the tender.
    pub is_relevant: bool,
    /// Brief explanation of why it is or is not relevant.
    pub reasoning: String,
}

// The plan-synthesis schema is the domain [`Plan`] itself, so the
// oracle is constrained to produce exactly what gets persisted.

// ---------------------------------------------------------------------------
// Synthesizer
// ---------------------------------------------------------------------------

/// What one pipeline run produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SynthesisOutcome {
    /// The gate said no; nothing was persisted, nothing failed.
    NotRelevant { reasoning: String },
    /// A proposal was synthesized and persisted.
    Proposed { proposal_id: EntityId },
}

/// Relevance-gated proposal synthesizer for one capability kind.
pub struct Synthesizer {
    profile: CapabilityProfile,
    oracle: Arc<dyn Oracle>,
    proposals: Arc<dyn ProposalStore>,
}

impl Synthesizer {
    pub fn new(
        profile: CapabilityProfile,
        oracle: Arc<dyn Oracle>,
        proposals: Arc<dyn ProposalStore>,
    ) -> Self {
        Self {
            profile,
            oracle,
            proposals,
        }
    }

    /// Run the pipeline for one tender.
    ///
    /// Errors (oracle, store) propagate to the caller. In production
    /// that caller is the task tracker, which logs and swallows them so
    /// the trigger never observes a failure.
    pub async fn run(&self, tender: &Tender) -> Result<SynthesisOutcome, CoreError> {
        let kind = self.profile.kind();
        tracing::info!(tender_id = %tender.id, capability = %kind, "Processing tender");

        // Stage 1: relevance gate.
        let verdict: RelevanceVerdict = self
            .oracle
            .generate(GenerateRequest::for_type::<RelevanceVerdict>(
                prompts::relevance(&self.profile, tender),
            ))
            .await
            .map_err(CoreError::from)?
            .decode()
            .map_err(CoreError::from)?;

        if !verdict.is_relevant {
            tracing::info!(
                tender_id = %tender.id,
                capability = %kind,
                reasoning = %verdict.reasoning,
                "Tender not relevant for capability"
            );
            return Ok(SynthesisOutcome::NotRelevant {
                reasoning: verdict.reasoning,
            });
        }

        // Stage 2: plan synthesis.
        let plan: Plan = self
            .oracle
            .generate(GenerateRequest::for_type::<Plan>(prompts::plan(
                &self.profile,
                tender,
            )))
            .await
            .map_err(CoreError::from)?
            .decode()
            .map_err(CoreError::from)?;

        if plan.steps.is_empty() {
            return Err(CoreError::Upstream(
                "oracle synthesized a plan with no steps".into(),
            ));
        }

        // Stage 3: persist. The store enforces referential integrity,
        // the cost-sum invariant, and the (tender, capability)
        // idempotency key.
        let proposal = self
            .proposals
            .create(NewProposal {
                tender_id: tender.id,
                capability: kind,
                reasoning: verdict.reasoning,
                plan,
            })
            .await?;

        tracing::info!(
            tender_id = %tender.id,
            capability = %kind,
            proposal_id = %proposal.id,
            "Proposal synthesized and persisted"
        );
        Ok(SynthesisOutcome::Proposed {
            proposal_id: proposal.id,
        })
    }
}
