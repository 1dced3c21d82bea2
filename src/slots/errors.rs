//! # Slot Accounting Errors

use thiserror::Error;

use super::types::SlotKey;
use crate::store::{ConstraintKind, StoreError};

/// Result type for slot accounting operations
pub type SlotResult<T> = Result<T, SlotError>;

/// Slot accounting errors
///
/// Constraint failures keep the three-way split the store reports:
/// foreign key, uniqueness, everything else.
#[derive(Debug, Clone, Error)]
pub enum SlotError {
    /// Committee or senate division does not exist
    #[error("Referenced committee or senate division does not exist: {0}")]
    ForeignKeyViolation(String),

    /// A slot already exists for the committee/division pair
    #[error("Slot already exists: {0}")]
    UniqueConstraintViolation(String),

    /// No slot matches the key
    #[error("No slot for committee {} and senate division {}", .0.committee_id, .0.senate_division)]
    NotFound(SlotKey),

    /// Connection loss, timeout, or any unclassified store failure
    #[error("Transaction failed: {0}")]
    Transaction(String),
}

impl SlotError {
    /// Conflict-class errors: the request was well formed but collides with stored state
    pub fn is_conflict(&self) -> bool {
        matches!(
            self,
            SlotError::ForeignKeyViolation(_) | SlotError::UniqueConstraintViolation(_)
        )
    }
}

impl From<StoreError> for SlotError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Constraint {
                kind: ConstraintKind::ForeignKey,
                message,
            } => SlotError::ForeignKeyViolation(message),
            StoreError::Constraint {
                kind: ConstraintKind::Unique,
                message,
            } => SlotError::UniqueConstraintViolation(message),
            other => SlotError::Transaction(other.to_string()),
        }
    }
}
