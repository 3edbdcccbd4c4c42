//! Record lifecycle and store errors

use thiserror::Error;
use uuid::Uuid;

use super::accreditation::InvalidTransition;

/// Result type for record operations
pub type RecordResult<T> = Result<T, RecordError>;

/// Record errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RecordError {
    /// No record with this id exists for the trader
    #[error("Record {0} not found")]
    NotFound(Uuid),

    /// No profile exists for the trader
    #[error("Trader profile for {0} not found")]
    ProfileNotFound(String),

    /// Record already exists (id collision on insert)
    #[error("Record {0} already exists")]
    AlreadyExists(Uuid),

    /// Record is locked pending accreditation
    #[error("Record {0} is locked and cannot be changed")]
    Locked(Uuid),

    /// Record was removed
    #[error("Record {0} has been removed and cannot be changed")]
    Inactive(Uuid),

    /// Record changed since it was read
    #[error(
        "Record {record_id} was modified concurrently (expected version {expected}, found {found})"
    )]
    VersionConflict {
        record_id: Uuid,
        expected: u64,
        found: u64,
    },

    /// Accreditation state machine refused the event
    #[error(transparent)]
    InvalidTransition(#[from] InvalidTransition),

    /// Backing store failure
    #[error("Record store failure: {0}")]
    Store(String),
}
