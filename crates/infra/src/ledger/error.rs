use thiserror::Error;

use stocktag_core::DomainError;

use crate::labels::LabelError;
use crate::store::StoreError;

/// Failure of a ledger operation.
///
/// Every variant except `PartialFailure` guarantees that no stored state was
/// changed. `PartialFailure` means a commit was sent but its outcome could
/// not be confirmed; callers must re-read before doing anything else.
#[derive(Debug, Error)]
pub enum LedgerError {
    /// Malformed input (negative quantity, blank name, self-nesting, bad id).
    #[error("validation failed: {0}")]
    Validation(String),

    /// Referenced asset or relationship is absent.
    #[error("not found: {0}")]
    NotFound(String),

    /// No spare units left to check out or attach.
    #[error("capacity exceeded: {0}")]
    Capacity(String),

    /// Duplicate relationship or nesting cycle.
    #[error("conflict: {0}")]
    Conflict(String),

    /// Stored data violates a counter invariant.
    #[error("invariant violated: {0}")]
    Invariant(String),

    /// Commit outcome unknown.
    #[error("partial failure: {0}")]
    PartialFailure(String),

    /// Datastore unreachable or timed out.
    #[error("datastore unavailable: {0}")]
    Unavailable(String),
}

impl From<DomainError> for LedgerError {
    fn from(value: DomainError) -> Self {
        match value {
            DomainError::Validation(msg) => LedgerError::Validation(msg),
            DomainError::InvalidId(msg) => LedgerError::Validation(msg),
            DomainError::InvariantViolation(msg) => LedgerError::Invariant(msg),
            DomainError::NotFound(msg) => LedgerError::NotFound(msg),
            DomainError::Capacity(msg) => LedgerError::Capacity(msg),
            DomainError::Conflict(msg) => LedgerError::Conflict(msg),
        }
    }
}

impl From<StoreError> for LedgerError {
    fn from(value: StoreError) -> Self {
        match value {
            StoreError::NotFound(msg) => LedgerError::NotFound(msg),
            StoreError::Capacity(msg) => LedgerError::Capacity(msg),
            StoreError::Duplicate(msg) | StoreError::Cycle(msg) | StoreError::Held(msg) => {
                LedgerError::Conflict(msg)
            }
            StoreError::Constraint(msg) => LedgerError::Invariant(msg),
            StoreError::Unavailable(msg) => LedgerError::Unavailable(msg),
            StoreError::OutcomeUnknown(msg) => LedgerError::PartialFailure(msg),
            // Driver faults outside a commit: nothing was written.
            StoreError::Backend(msg) => LedgerError::Unavailable(msg),
        }
    }
}

/// Failure of a label print request. Never implies a stored-data change.
#[derive(Debug, Error)]
pub enum PrintError {
    #[error(transparent)]
    Ledger(#[from] LedgerError),

    #[error("no label printer is configured")]
    NotConfigured,

    #[error("label printing failed: {0}")]
    Failed(String),
}

impl From<LabelError> for PrintError {
    fn from(value: LabelError) -> Self {
        PrintError::Failed(value.to_string())
    }
}
