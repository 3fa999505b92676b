use crate::types::EntityId;

/// Domain error taxonomy.
///
/// Synchronous handlers translate these into client-facing HTTP responses;
/// detached background tasks log them and never let them escape.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// Malformed or missing request fields.
    #[error("Validation failed: {0}")]
    Validation(String),

    /// A referenced entity does not exist.
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: EntityId },

    /// The operation is not possible in the entity's current state
    /// (e.g. evaluating a tender that has no proposals, or a duplicate
    /// proposal for the same tender/capability pair).
    #[error("Invalid state: {0}")]
    InvalidState(String),

    /// An upstream collaborator (oracle, payment provider, capability
    /// endpoint) was unreachable or returned a malformed response.
    #[error("Upstream error: {0}")]
    Upstream(String),

    /// Anything else. The message is logged but not surfaced verbatim.
    #[error("Internal error: {0}")]
    Internal(String),
}
