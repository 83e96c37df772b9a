//! Domain error taxonomy shared by all crates.

use crate::types::DbId;

/// Domain-level error returned by repositories and handlers.
///
/// Precondition violations (missing rows, duplicate names/slugs, attempted
/// tree cycles) are always detected before any write and surface as one of
/// the typed variants below; [`CoreError::Internal`] is reserved for
/// mutations that passed every precondition and still failed to persist.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// A referenced entity does not exist.
    #[error("{entity} with id {id} not found")]
    NotFound { entity: &'static str, id: DbId },

    /// The request is well-formed but violates a domain rule.
    #[error("{0}")]
    Validation(String),

    /// The request conflicts with existing state (duplicate name/slug).
    #[error("{0}")]
    Conflict(String),

    /// Missing or invalid credentials.
    #[error("{0}")]
    Unauthorized(String),

    /// Authenticated but not permitted.
    #[error("{0}")]
    Forbidden(String),

    /// Unexpected failure after preconditions passed.
    #[error("{0}")]
    Internal(String),
}
