//! Errors raised by the pure asset rules.

use thiserror::Error;

pub type DomainResult<T> = Result<T, DomainError>;

/// A rule rejected the requested change.
///
/// Storage and timeout failures never appear here; the infra layer has its
/// own error types for those.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Malformed input: negative quantity, blank name, bad page number.
    #[error("validation failed: {0}")]
    Validation(String),

    /// `0 <= in_use <= quantity` would no longer hold.
    #[error("invariant violated: {0}")]
    InvariantViolation(String),

    #[error("invalid identifier: {0}")]
    InvalidId(String),

    #[error("not found: {0}")]
    NotFound(String),

    /// Every unit of the asset is already committed.
    #[error("capacity exceeded: {0}")]
    Capacity(String),

    /// Duplicate edge or a nesting cycle.
    #[error("conflict: {0}")]
    Conflict(String),
}

impl DomainError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn invariant(msg: impl Into<String>) -> Self {
        Self::InvariantViolation(msg.into())
    }

    pub fn invalid_id(msg: impl Into<String>) -> Self {
        Self::InvalidId(msg.into())
    }

    pub fn not_found(what: impl Into<String>) -> Self {
        Self::NotFound(what.into())
    }

    pub fn capacity(msg: impl Into<String>) -> Self {
        Self::Capacity(msg.into())
    }

    pub fn conflict(msg: impl Into<String>) -> Self {
        Self::Conflict(msg.into())
    }
}
