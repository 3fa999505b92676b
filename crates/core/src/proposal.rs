//! Proposal types: a capability provider's costed, step-by-step offer
//! to solve a tender.
//!
//! [`Plan`], [`Step`], and [`ApiCall`] double as the oracle's
//! plan-synthesis output schema (via `schemars`), so their shape is
//! exactly what the oracle is constrained to produce.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::capability::CapabilityKind;
use crate::error::CoreError;
use crate::types::EntityId;

/// Tolerance when comparing the declared total cost to the step sum.
const COST_EPSILON: f64 = 1e-6;

// ---------------------------------------------------------------------------
// Proposal
// ---------------------------------------------------------------------------

/// A persisted proposal. Immutable once created.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Proposal {
    pub id: EntityId,
    /// The tender this proposal answers. Always references an existing
    /// tender (enforced at creation).
    pub tender_id: EntityId,
    /// Which capability provider produced this proposal. Together with
    /// `tender_id` this forms the idempotency key.
    pub capability: CapabilityKind,
    /// Why the provider considers itself relevant to the tender.
    pub reasoning: String,
    pub plan: Plan,
    pub created_at: DateTime<Utc>,
}

/// Input for creating a proposal.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewProposal {
    pub tender_id: EntityId,
    pub capability: CapabilityKind,
    pub reasoning: String,
    pub plan: Plan,
}

// ---------------------------------------------------------------------------
// Plan
// ---------------------------------------------------------------------------

/// An ordered, costed execution plan.
#[derive(Debug, Clone, Serialize, Deserialize, schemars::JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Plan {
    /// Ordered list of steps.
    pub steps: Vec<Step>,
    /// Total estimated cost in USD. Must equal the sum of step prices.
    pub total_estimated_cost: f64,
    /// What the final result will look like.
    pub expected_outcome: String,
}

impl Plan {
    /// Sum of the per-step prices.
    pub fn step_cost_sum(&self) -> f64 {
        self.steps.iter().map(|s| s.price_per_call).sum()
    }

    /// Check the declared total against the step sum.
    ///
    /// The invariant is enforced at proposal creation rather than
    /// trusted from the oracle.
    pub fn validate_cost(&self) -> Result<(), CoreError> {
        let sum = self.step_cost_sum();
        if (self.total_estimated_cost - sum).abs() > COST_EPSILON {
            return Err(CoreError::Validation(format!(
                "totalEstimatedCost {} does not match step price sum {}",
                self.total_estimated_cost, sum
            )));
        }
        Ok(())
    }
}

/// One step of a plan: a described action plus the API call that
/// performs it.
#[derive(Debug, Clone, Serialize, Deserialize, schemars::JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Step {
    pub step_number: u32,
    /// Description of what this step does.
    pub action: String,
    pub api_call: ApiCall,
    /// Cost in USD for this API call.
    pub price_per_call: f64,
}

// ---------------------------------------------------------------------------
// ApiCall
// ---------------------------------------------------------------------------

/// A capability-specific invocation descriptor. Data, not code.
///
/// Search-style calls carry a free-text `query`; parameterized calls
/// carry a single named parameter. The untagged representation matches
/// the original wire format, where the two shapes are distinguished by
/// their fields alone.
#[derive(Debug, Clone, Serialize, Deserialize, schemars::JsonSchema)]
#[serde(untagged)]
pub enum ApiCall {
    /// `{endpoint, method, query}`: search-style capability.
    Search {
        endpoint: String,
        method: String,
        query: String,
    },
    /// `{endpoint, method, parameter: {name, value}}`: parameterized
    /// capability (news feeds, recaps, keyword search).
    Parameterized {
        endpoint: String,
        method: String,
        parameter: CallParameter,
    },
}

impl ApiCall {
    /// Endpoint URL of the call, whichever shape it takes.
    pub fn endpoint(&self) -> &str {
        match self {
            ApiCall::Search { endpoint, .. } => endpoint,
            ApiCall::Parameterized { endpoint, .. } => endpoint,
        }
    }
}

/// A single named parameter for a parameterized capability call.
#[derive(Debug, Clone, Serialize, Deserialize, schemars::JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct CallParameter {
    pub name: String,
    pub value: String,
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
