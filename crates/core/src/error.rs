//! Error taxonomy for the scheduling engine.
//!
//! Four classes, mirrored from the failure semantics of the planner:
//! validation and not-found surface directly to the caller, contention is
//! retried by the wrapper in the service crate, and any other storage
//! failure propagates immediately (the day stays dirty, so the next read
//! repeats the computation).

use crate::types::DbId;

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: DbId },

    #[error("Validation failed: {0}")]
    Validation(String),

    /// Transient lock/busy signal from the persistence layer. This is the
    /// only variant the retry wrapper acts on; everything else propagates
    /// on the first failure.
    #[error("Storage contention: {0}")]
    Contention(String),

    #[error("Storage error: {0}")]
    Storage(String),
}

impl CoreError {
    /// Whether this error is a transient contention signal worth retrying.
    pub fn is_contention(&self) -> bool {
        matches!(self, Self::Contention(_))
    }
}
