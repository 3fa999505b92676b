//! Store seams for tenders, proposals, and webhook registrations.
//!
//! Persistence proper is an external collaborator; these traits are the
//! boundary. The bundled [`MemoryStore`] serializes individual
//! create/read operations behind async locks, which is exactly the
//! externally-synchronized contract the rest of the system assumes.

mod memory;

pub use memory::MemoryStore;

use async_trait::async_trait;

use tendermill_core::error::CoreError;
use tendermill_core::proposal::{NewProposal, Proposal};
use tendermill_core::tender::Tender;
use tendermill_core::types::EntityId;
use tendermill_core::webhook::Webhook;

/// Result alias for store operations.
pub type StoreResult<T> = Result<T, CoreError>;

/// Durable keyed collection of tenders.
#[async_trait]
pub trait TenderStore: Send + Sync {
    /// Persist a tender. Tenders are immutable after creation.
    async fn create(&self, tender: Tender) -> StoreResult<Tender>;

    /// Fetch one tender by id, if it exists.
    async fn find(&self, id: EntityId) -> StoreResult<Option<Tender>>;

    /// All tenders, newest first.
    async fn list(&self) -> StoreResult<Vec<Tender>>;
}

/// Durable keyed collection of proposals per tender.
#[async_trait]
pub trait ProposalStore: Send + Sync {
    /// Persist a proposal.
    ///
    /// Fails `NotFound` when the referenced tender does not exist,
    /// `Validation` when the plan's declared total cost does not match
    /// its step-price sum, and `InvalidState` when a proposal for the
    /// same `(tender, capability)` idempotency key already exists.
    async fn create(&self, proposal: NewProposal) -> StoreResult<Proposal>;

    /// All proposals for one tender, oldest first.
    async fn find_by_tender(&self, tender_id: EntityId) -> StoreResult<Vec<Proposal>>;

    /// All proposals, newest first.
    async fn list(&self) -> StoreResult<Vec<Proposal>>;
}

/// Registry of webhook subscriber URLs.
#[async_trait]
pub trait WebhookStore: Send + Sync {
    /// Register a subscriber URL. Fails `Validation` on unparsable URLs.
    async fn register(&self, url: &str) -> StoreResult<Webhook>;

    /// All registrations, newest first.
    async fn list(&self) -> StoreResult<Vec<Webhook>>;
}
