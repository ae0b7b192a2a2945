//! Domain error taxonomy shared by all services.
//!
//! Every failure a service can report maps to exactly one of these
//! variants, so the REST layer can pick a status code without inspecting
//! message text.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum DomainError {
    /// Malformed or missing input (empty title, non-positive duration, ...)
    #[error("{0}")]
    Validation(String),

    /// Referenced entity absent, or not owned by the caller
    #[error("{0}")]
    NotFound(String),

    /// Today's date has no corresponding ledger entry
    #[error("{0}")]
    OutOfRange(String),

    /// Mutation attempted on a terminal-state habit
    #[error("{0}")]
    AlreadyCompleted(String),

    /// Duplicate registration, duplicate join, and similar collisions
    #[error("{0}")]
    Conflict(String),

    /// Storage layer failure
    #[error(transparent)]
    Storage(#[from] anyhow::Error),
}

impl DomainError {
    pub fn not_found(entity: &str, id: &str) -> Self {
        DomainError::NotFound(format!("{} not found: {}", entity, id))
    }
}
