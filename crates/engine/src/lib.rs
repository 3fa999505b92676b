//! Tender orchestration engine: relevance-gated proposal synthesis,
//! oracle-backed proposal selection, and tender drafting.

pub mod drafter;
pub mod profile;
pub mod prompts;
pub mod selector;
pub mod synthesizer;

pub use drafter::{DraftTender, TenderDrafter};
pub use profile::CapabilityProfile;
pub use selector::{Evaluation, Selector, SINGLE_PROPOSAL_REASONING};
pub use synthesizer::{SynthesisOutcome, Synthesizer};
