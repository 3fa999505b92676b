//! Oracle output schema for one payment-loop decision.

use serde::{Deserialize, Serialize};

/// Which tool the loop should use next.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, schemars::JsonSchema)]
#[serde(rename_all = "snake_case")]
pub(crate) enum LoopAction {
    /// Call the capability endpoint (first attempt or paid retry).
    InvokeCapability,
    /// Invoke one of the provider's payment tools by name.
    InvokePaymentTool,
    /// Stop and report a final answer.
    Finish,
}

/// One decision over the transcript so far. The oracle picks the next
/// move; legality is enforced by the runner, not trusted from here.
#[derive(Debug, Clone, Deserialize, schemars::JsonSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct LoopDecision {
    pub action: LoopAction,
    /// Payment credential to send as `X-Payment` on a capability retry.
    pub payment_header: Option<String>,
    /// Payment tool to invoke when action is `invoke_payment_tool`.
    pub tool_name: Option<String>,
    /// Arguments forwarded verbatim to the payment tool.
    pub tool_arguments: Option<serde_json::Value>,
    /// Final answer text when action is `finish`.
    pub response: Option<String>,
}
