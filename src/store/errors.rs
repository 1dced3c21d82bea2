//! # Store Errors
//!
//! Error types for the relational store. Constraint failures are classified
//! here, once, from the client's structured error report.

use rusqlite::ffi;
use rusqlite::ErrorCode;
use thiserror::Error;

/// Result type for store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Which constraint a failed statement tripped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConstraintKind {
    /// Referenced row does not exist
    ForeignKey,
    /// Unique or primary key collision
    Unique,
    /// NOT NULL, CHECK, or anything else the engine reports as a constraint
    Other,
}

impl ConstraintKind {
    /// Classify an SQLite extended result code
    pub fn from_extended_code(code: i32) -> Self {
        match code {
            ffi::SQLITE_CONSTRAINT_FOREIGNKEY => ConstraintKind::ForeignKey,
            ffi::SQLITE_CONSTRAINT_UNIQUE | ffi::SQLITE_CONSTRAINT_PRIMARYKEY => {
                ConstraintKind::Unique
            }
            _ => ConstraintKind::Other,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ConstraintKind::ForeignKey => "foreign_key",
            ConstraintKind::Unique => "unique",
            ConstraintKind::Other => "other",
        }
    }
}

/// Relational store errors
#[derive(Debug, Clone, Error)]
pub enum StoreError {
    /// A statement violated a table constraint
    #[error("Constraint violation ({}): {message}", .kind.as_str())]
    Constraint {
        kind: ConstraintKind,
        message: String,
    },

    /// The connection could not be opened or used
    #[error("Connection error: {0}")]
    Connection(String),

    /// The database was busy or locked past the busy timeout
    #[error("Database busy: {0}")]
    Busy(String),

    /// Any other engine failure
    #[error("Query failed: {0}")]
    Query(String),
}

impl StoreError {
    /// Constraint kind, if this is a constraint violation
    pub fn constraint_kind(&self) -> Option<ConstraintKind> {
        match self {
            StoreError::Constraint { kind, .. } => Some(*kind),
            _ => None,
        }
    }
}

impl From<rusqlite::Error> for StoreError {
    fn from(err: rusqlite::Error) -> Self {
        match &err {
            rusqlite::Error::SqliteFailure(failure, message) => {
                let message = message.clone().unwrap_or_else(|| failure.to_string());
                match failure.code {
                    ErrorCode::ConstraintViolation => StoreError::Constraint {
                        kind: ConstraintKind::from_extended_code(failure.extended_code),
                        message,
                    },
                    ErrorCode::DatabaseBusy | ErrorCode::DatabaseLocked => {
                        StoreError::Busy(message)
                    }
                    ErrorCode::CannotOpen | ErrorCode::NotADatabase => {
                        StoreError::Connection(message)
                    }
                    _ => StoreError::Query(message),
                }
            }
            _ => StoreError::Query(err.to_string()),
        }
    }
}

impl From<tokio::task::JoinError> for StoreError {
    fn from(err: tokio::task::JoinError) -> Self {
        StoreError::Connection(format!("store task did not complete: {}", err))
    }
}
