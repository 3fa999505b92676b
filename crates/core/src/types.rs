//! Shared primitive types.

/// Identifier for every persisted entity (tenders, proposals, webhooks).
pub type EntityId = uuid::Uuid;

/// Generate a fresh, time-ordered entity id.
pub fn new_id() -> EntityId {
    uuid::Uuid::now_v7()
}
