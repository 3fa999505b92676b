//! Payment-required retry loop.
//!
//! Some capability endpoints answer `402 Payment Required` with payment
//! details in the body. This crate runs the bounded decision loop that
//! resolves such challenges: invoke the capability, observe a 402, pay
//! through the payment-tool provider, retry with the issued credential.
//! The oracle only picks the next tool; the legality of each move is
//! enforced here, by an explicit state machine.
//!
//! Nothing in this crate persists anything. Payment credentials live
//! exactly as long as one [`PaymentLoop::run`] call.

mod decision;
mod invoker;
mod provider;
mod prompts;
mod runner;

pub use invoker::{CapabilityInvoker, CapabilityObservation};
pub use provider::{HttpPaymentProvider, PaymentTool, PaymentToolProvider};
pub use runner::{PaymentLoop, PaymentOutcome, PaymentRequest, StepRecord, MAX_STEPS};
