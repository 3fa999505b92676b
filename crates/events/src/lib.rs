//! Tender platform events and webhook fan-out.

mod notifier;
mod payload;

pub use notifier::{NotifyReport, WebhookNotifier};
pub use payload::{TenderCreated, TenderPayload};
