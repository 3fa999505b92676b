//! The bounded payment-required retry loop.
//!
//! State machine, enforced here rather than trusted to the oracle:
//!
//! ```text
//! Start → InvokeCapability → Success (terminal)
//!                          → Challenged (402)
//! Challenged → InvokePaymentTool → RetryCapability → Success
//!                                                  → Challenged
//! any state, 20 decisions spent → Exhausted (terminal, unsuccessful)
//! ```
//!
//! Illegal moves (paying before any 402, or retrying a challenged
//! capability without an intervening payment) are rejected with a
//! protocol observation fed back to the oracle, and count against the
//! step budget. An unresolved 402 within budget is a valid,
//! unsuccessful outcome, not an error.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use tendermill_core::capability::{CapabilityConfig, CapabilityKind};
use tendermill_core::error::CoreError;
use tendermill_oracle::{GenerateRequest, Oracle, OracleUsage};

use crate::decision::{LoopAction, LoopDecision};
use crate::invoker::{CapabilityInvoker, CapabilityObservation};
use crate::prompts;
use crate::provider::PaymentToolProvider;

/// Decision-step budget for one payment call.
pub const MAX_STEPS: u32 = 20;

/// Longest observation snippet fed back into the transcript.
const SNIPPET_LEN: usize = 400;

// ---------------------------------------------------------------------------
// Request / outcome types
// ---------------------------------------------------------------------------

/// A request to call a capability, paying if challenged.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentRequest {
    /// Capability kind, e.g. `"search"` or `"news"`.
    pub service: String,
    /// Query or parameter value to send.
    pub query: String,
    /// Override the configured capability endpoint.
    pub endpoint: Option<String>,
    /// Override the configured parameter name (parameterized style).
    pub parameter_name: Option<String>,
}

/// One recorded decision step.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StepRecord {
    pub step_number: u32,
    /// What happened: `invoke_capability`, `invoke_payment_tool`,
    /// `finish`, or `protocol_violation`.
    pub action: String,
    pub detail: String,
    /// HTTP status for capability calls.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,
}

/// Terminal result of one payment call. `success` is only true when
/// the last capability response was an observed non-402 success.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentOutcome {
    pub success: bool,
    pub response_text: String,
    pub steps: Vec<StepRecord>,
    pub usage: OracleUsage,
}

// ---------------------------------------------------------------------------
// PaymentLoop
// ---------------------------------------------------------------------------

/// Runs the decision loop for one [`PaymentRequest`].
pub struct PaymentLoop {
    oracle: Arc<dyn Oracle>,
    provider: Arc<dyn PaymentToolProvider>,
    config: CapabilityConfig,
}

/// Mutable loop state shared by the step handlers.
struct LoopState {
    challenged: bool,
    paid_since_challenge: bool,
    last_capability: Option<CapabilityObservation>,
    transcript: Vec<String>,
    steps: Vec<StepRecord>,
    usage: OracleUsage,
}

impl LoopState {
    fn new() -> Self {
        Self {
            challenged: false,
            paid_since_challenge: false,
            last_capability: None,
            transcript: Vec::new(),
            steps: Vec::new(),
            usage: OracleUsage::default(),
        }
    }

    fn record(&mut self, step: u32, action: &str, detail: String, status: Option<u16>) {
        self.transcript.push(match status {
            Some(code) => format!("Step {step} [{action}] HTTP {code}: {detail}"),
            None => format!("Step {step} [{action}]: {detail}"),
        });
        self.steps.push(StepRecord {
            step_number: step,
            action: action.to_string(),
            detail,
            status,
        });
    }
}

impl PaymentLoop {
    pub fn new(
        oracle: Arc<dyn Oracle>,
        provider: Arc<dyn PaymentToolProvider>,
        config: CapabilityConfig,
    ) -> Self {
        Self {
            oracle,
            provider,
            config,
        }
    }

    /// Run the loop to a terminal state.
    ///
    /// `Validation` for an unknown or unconfigured service; `Upstream`
    /// when the oracle, the payment provider, or the capability
    /// transport fails. Everything else, including a 402 that never
    /// gets resolved, terminates with an `Ok` outcome.
    pub async fn run(&self, request: PaymentRequest) -> Result<PaymentOutcome, CoreError> {
        let kind = CapabilityKind::from_str(&request.service).ok_or_else(|| {
            CoreError::Validation(format!(
                "Service must be one of: {}",
                CapabilityKind::all()
                    .iter()
                    .map(CapabilityKind::as_str)
                    .collect::<Vec<_>>()
                    .join(", ")
            ))
        })?;
        let entry = self.config.get(kind).ok_or_else(|| {
            CoreError::Validation(format!("capability '{kind}' is not configured"))
        })?;

        // Provider connectivity is checked up front; failure here is
        // fatal for the whole call.
        let tools = self.provider.list_tools().await?;
        let invoker = CapabilityInvoker::from_entry(
            entry,
            request.endpoint.clone(),
            request.parameter_name.clone(),
        )?;

        tracing::info!(
            service = %kind,
            query = %request.query,
            endpoint = %invoker.endpoint(),
            tools = tools.len(),
            "Starting payment loop"
        );

        let mut state = LoopState::new();

        for step in 1..=MAX_STEPS {
            let prompt = prompts::decision(
                kind,
                &request.query,
                invoker.endpoint(),
                &tools,
                &state.transcript,
            );
            let generated = self
                .oracle
                .generate(GenerateRequest::for_type::<LoopDecision>(prompt))
                .await
                .map_err(CoreError::from)?;
            state.usage.absorb(generated.usage);
            let decision: LoopDecision = generated.decode().map_err(CoreError::from)?;

            match decision.action {
                LoopAction::InvokeCapability => {
                    if let Some(outcome) =
                        self.invoke_capability(&invoker, &request.query, &decision, step, &mut state)
                            .await?
                    {
                        return Ok(outcome);
                    }
                }
                LoopAction::InvokePaymentTool => {
                    self.invoke_payment_tool(&tools, &decision, step, &mut state)
                        .await?;
                }
                LoopAction::Finish => {
                    return Ok(self.finish(decision, step, state));
                }
            }
        }

        tracing::warn!(service = %kind, "Payment loop exhausted its step budget");
        Ok(PaymentOutcome {
            success: false,
            response_text: format!("Stopped after {MAX_STEPS} steps without a successful response"),
            steps: state.steps,
            usage: state.usage,
        })
    }

    /// Handle an `invoke_capability` decision. Returns the terminal
    /// outcome on a non-402 success.
    async fn invoke_capability(
        &self,
        invoker: &CapabilityInvoker,
        query: &str,
        decision: &LoopDecision,
        step: u32,
        state: &mut LoopState,
    ) -> Result<Option<PaymentOutcome>, CoreError> {
        // A challenged capability may only be retried with a credential
        // issued after an intervening payment.
        if state.challenged && !state.paid_since_challenge {
            state.record(
                step,
                "protocol_violation",
                "Rejected: the capability returned 402; a payment tool must be \
                 invoked before retrying"
                    .into(),
                None,
            );
            return Ok(None);
        }

        let observation = invoker
            .invoke(query, decision.payment_header.as_deref())
            .await?;
        let detail = snippet(&observation.data);
        state.record(step, "invoke_capability", detail.clone(), Some(observation.status));

        if observation.is_success() {
            tracing::info!(step, status = observation.status, "Capability call succeeded");
            return Ok(Some(PaymentOutcome {
                success: true,
                response_text: detail,
                steps: std::mem::take(&mut state.steps),
                usage: state.usage,
            }));
        }
        if observation.is_payment_required() {
            tracing::info!(step, "Capability requires payment");
            state.challenged = true;
            state.paid_since_challenge = false;
        }
        state.last_capability = Some(observation);
        Ok(None)
    }

    /// Handle an `invoke_payment_tool` decision.
    async fn invoke_payment_tool(
        &self,
        tools: &[crate::provider::PaymentTool],
        decision: &LoopDecision,
        step: u32,
        state: &mut LoopState,
    ) -> Result<(), CoreError> {
        // No payment before the first observed 402.
        if !state.challenged {
            state.record(
                step,
                "protocol_violation",
                "Rejected: no payment has been requested; invoke the capability first".into(),
                None,
            );
            return Ok(());
        }

        let name = match decision
            .tool_name
            .as_deref()
            .filter(|name| tools.iter().any(|t| t.name == *name))
        {
            Some(name) => name,
            None => {
                state.record(
                    step,
                    "protocol_violation",
                    format!(
                        "Rejected: '{}' is not an available payment tool",
                        decision.tool_name.as_deref().unwrap_or("<none>")
                    ),
                    None,
                );
                return Ok(());
            }
        };

        let arguments = decision
            .tool_arguments
            .clone()
            .unwrap_or(serde_json::Value::Object(Default::default()));
        let result = self.provider.invoke(name, arguments).await?;
        state.paid_since_challenge = true;
        state.record(
            step,
            "invoke_payment_tool",
            format!("{name} → {}", snippet(&result)),
            None,
        );
        Ok(())
    }

    /// Handle a `finish` decision. Success is only honored when the
    /// last capability response was an observed non-402 success.
    fn finish(&self, decision: LoopDecision, step: u32, mut state: LoopState) -> PaymentOutcome {
        let honored = state
            .last_capability
            .as_ref()
            .is_some_and(CapabilityObservation::is_success);
        let response_text = decision
            .response
            .unwrap_or_else(|| "No final response".to_string());
        state.record(step, "finish", response_text.clone(), None);

        if !honored {
            tracing::info!(step, "Finish without a successful capability response");
        }
        PaymentOutcome {
            success: honored,
            response_text,
            steps: state.steps,
            usage: state.usage,
        }
    }
}

/// Bounded, lossy rendering of a JSON observation for transcripts.
fn snippet(value: &serde_json::Value) -> String {
    let mut text = value.to_string();
    if text.len() > SNIPPET_LEN {
        let mut cut = SNIPPET_LEN;
        while !text.is_char_boundary(cut) {
            cut -= 1;
        }
        text.truncate(cut);
        text.push('…');
    }
    text
}
