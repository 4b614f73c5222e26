// ⚠️ Error taxonomy for the ledger
//
// ValidationError   - rejected input on add / filter
// IndexOutOfRange   - positional removal outside the list
// NotFound          - removal by id that matches nothing
// StorageUnavailable - durable slot could not be read or written

use crate::entities::TransactionId;

/// Malformed or missing input. Nothing is stored when one of these is raised.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    #[error("description cannot be empty")]
    EmptyDescription,

    #[error("\"{0}\" is not a valid amount")]
    InvalidAmount(String),

    #[error("amount cannot be negative (got {0})")]
    NegativeAmount(f64),

    #[error("\"{0}\" is not a recognized category")]
    UnknownCategory(String),

    #[error("\"{0}\" is not a recognized type (expected income or expense)")]
    UnknownType(String),

    #[error("\"{0}\" is not a date in YYYY-MM-DD format")]
    InvalidDate(String),
}

/// Failures of the durable key-value slot.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("storage backend failed: {0}")]
    Backend(#[from] rusqlite::Error),

    #[error("stored transactions are malformed: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("could not create storage directory: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, thiserror::Error)]
pub enum TrackerError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("index {index} is out of range for {len} transactions")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("no transaction with id {0}")]
    NotFound(TransactionId),

    /// Non-fatal: callers keep the in-memory list and carry on session-only.
    #[error("storage unavailable: {0}")]
    StorageUnavailable(#[from] StorageError),
}
