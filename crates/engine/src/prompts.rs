//! Prompt builders for every oracle consultation.

use tendermill_core::proposal::Proposal;
use tendermill_core::tender::Tender;

use crate::profile::CapabilityProfile;

/// The tender block shared by the relevance and planning prompts.
fn tender_details(tender: &Tender) -> String {
    format!(
        "Tender Details:\n\
         - Problem: {}\n\
         - Desired Outcome: {}\n\
         - Constraints: {}",
        tender.problem,
        tender.desired_outcome,
        tender.constraints.join(", "),
    )
}

/// Relevance-gate prompt: can this capability meaningfully contribute?
pub fn relevance(profile: &CapabilityProfile, tender: &Tender) -> String {
    format!(
        "You are evaluating whether a tender request can be solved using the {kind} capability.\n\
         \n\
         {capabilities}\n\
         \n\
         {details}\n\
         \n\
         Determine if this capability can help solve this tender.\n\
         Only mark as relevant if it can meaningfully contribute to the solution.",
        kind = profile.kind(),
        capabilities = profile.description(),
        details = tender_details(tender),
    )
}

/// Plan-synthesis prompt: produce an ordered, costed step list.
pub fn plan(profile: &CapabilityProfile, tender: &Tender) -> String {
    format!(
        "You are creating a detailed plan to solve a tender using the {kind} capability.\n\
         \n\
         {capabilities}\n\
         \n\
         {details}\n\
         \n\
         Create a step-by-step plan showing:\n\
         1. What API calls to make\n\
         2. The required parameter name and value for each call\n\
         3. The cost per call, using the pricing listed above\n\
         4. The expected outcome\n\
         \n\
         Be specific about which endpoint to use and only include the \
         required parameter for each call. The total estimated cost must \
         equal the sum of the per-step prices.",
        kind = profile.kind(),
        capabilities = profile.description(),
        details = tender_details(tender),
    )
}

/// Selection prompt: choose the best proposal among several.
///
/// Each proposal is digested down to id, reasoning, total cost, step
/// count, and expected outcome.
pub fn selection(tender: &Tender, proposals: &[Proposal]) -> String {
    let digests: String = proposals
        .iter()
        .enumerate()
        .map(|(i, p)| {
            format!(
                "\nProposal {n} (ID: {id}):\n\
                 - Reasoning: {reasoning}\n\
                 - Total Cost: ${cost}\n\
                 - Steps: {steps}\n\
                 - Expected Outcome: {outcome}\n",
                n = i + 1,
                id = p.id,
                reasoning = p.reasoning,
                cost = p.plan.total_estimated_cost,
                steps = p.plan.steps.len(),
                outcome = p.plan.expected_outcome,
            )
        })
        .collect();

    format!(
        "For this tender, choose the best proposal.\n\
         \n\
         Tender:\n\
         - Problem: {problem}\n\
         - Desired Outcome: {outcome}\n\
         - Constraints: {constraints}\n\
         \n\
         Proposals:\n\
         {digests}\n\
         Select the proposal that best addresses the tender requirements. \
         Consider cost, feasibility, and alignment with desired outcome. \
         The selected ID must be one of the proposal IDs listed above.",
        problem = tender.problem,
        outcome = tender.desired_outcome,
        constraints = tender.constraints.join(", "),
        digests = digests,
    )
}

/// Drafting prompt: turn a free-text request into a structured tender.
pub fn draft(request_text: &str) -> String {
    format!(
        "Convert this tender request into a structured Request for Proposals (RFP). \
         Keep it minimal and concise.\n\
         \n\
         Tender request: \"{request_text}\"\n\
         \n\
         Generate a structured tender with:\n\
         - Problem: The pain point or issue to solve\n\
         - Desired Outcome: What success looks like\n\
         - Constraints: Key limitations (keep to 2-3 items max)\n\
         - Evaluation Criteria: How submissions will be judged (2-3 criteria with weights)\n\
         - Submission Format: Required delivery format (endpoint/handle, sample output \
         description, pricing)\n\
         \n\
         Keep everything concise and actionable."
    )
}
