//! Prompt assembly for the payment-loop decisions.

use tendermill_core::capability::CapabilityKind;

use crate::provider::PaymentTool;

/// Build the decision prompt: task, rules, available payment tools,
/// and the transcript of everything observed so far.
pub(crate) fn decision(
    kind: CapabilityKind,
    query: &str,
    endpoint: &str,
    tools: &[PaymentTool],
    transcript: &[String],
) -> String {
    let mut prompt = format!(
        "You are resolving a paid API call.\n\n\
         Task: call the {kind} capability at {endpoint} with \"{query}\" \
         and obtain a successful response.\n\n\
         Rules:\n\
         - If the capability returns HTTP 402, payment is required. The \
         response body contains payment details. Use one of the payment \
         tools to send the payment, then retry the capability with the \
         payment credential from the payment response as paymentHeader.\n\
         - Finish once the capability returns a successful response, or \
         when no further progress is possible.\n\n\
         Payment tools:\n"
    );
    for tool in tools {
        prompt.push_str(&format!("- {}: {}\n", tool.name, tool.description));
    }

    if transcript.is_empty() {
        prompt.push_str("\nNothing has happened yet. Decide the first action.\n");
    } else {
        prompt.push_str("\nTranscript so far:\n");
        for line in transcript {
            prompt.push_str(line);
            prompt.push('\n');
        }
        prompt.push_str("\nDecide the next action.\n");
    }
    prompt
}
