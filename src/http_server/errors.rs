//! # HTTP Errors
//!
//! Maps validation, slot accounting and store failures onto status codes and
//! a stable JSON error body.

use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;

use crate::observability::MetricsRegistry;
use crate::slots::{CommitteeId, SlotError};
use crate::store::{ConstraintKind, StoreError};

/// Result type for handlers
pub type ApiResult<T> = Result<T, ApiError>;

/// HTTP-facing errors
#[derive(Debug, Clone, Error)]
pub enum ApiError {
    // ==================
    // Client Errors (4xx)
    // ==================
    /// Malformed or incomplete request, rejected before any store call
    #[error("{0}")]
    Validation(String),

    /// Update would take the committee total below the configured minimum
    #[error("Update would reduce total slots to {projected}, below the minimum of {minimum}")]
    BelowMinimum { projected: i64, minimum: i64 },

    /// Committee does not exist
    #[error("Committee {0} not found")]
    CommitteeNotFound(CommitteeId),

    // ==================
    // Layer Errors
    // ==================
    /// Slot accounting failure
    #[error("{0}")]
    Slot(#[from] SlotError),

    /// Store failure outside slot accounting
    #[error("{0}")]
    Store(#[from] StoreError),
}

impl ApiError {
    /// Get HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) | ApiError::BelowMinimum { .. } => StatusCode::BAD_REQUEST,
            ApiError::CommitteeNotFound(_) => StatusCode::NOT_FOUND,

            ApiError::Slot(err) if err.is_conflict() => StatusCode::CONFLICT,
            ApiError::Slot(SlotError::NotFound(_)) => StatusCode::NOT_FOUND,
            ApiError::Slot(_) => StatusCode::INTERNAL_SERVER_ERROR,

            ApiError::Store(err) => match err.constraint_kind() {
                Some(ConstraintKind::ForeignKey) | Some(ConstraintKind::Unique) => {
                    StatusCode::CONFLICT
                }
                _ => StatusCode::INTERNAL_SERVER_ERROR,
            },
        }
    }

    /// Machine-stable error code
    pub fn code(&self) -> &'static str {
        match self {
            ApiError::Validation(_) => "VALIDATION_ERROR",
            ApiError::BelowMinimum { .. } => "SLOT_MINIMUM_VIOLATION",
            ApiError::CommitteeNotFound(_) => "COMMITTEE_NOT_FOUND",

            ApiError::Slot(SlotError::ForeignKeyViolation(_)) => "FOREIGN_KEY_VIOLATION",
            ApiError::Slot(SlotError::UniqueConstraintViolation(_)) => "DUPLICATE_SLOT",
            ApiError::Slot(SlotError::NotFound(_)) => "SLOT_NOT_FOUND",
            ApiError::Slot(SlotError::Transaction(_)) => "TRANSACTION_ERROR",

            ApiError::Store(err) => match err.constraint_kind() {
                Some(ConstraintKind::ForeignKey) => "FOREIGN_KEY_VIOLATION",
                Some(ConstraintKind::Unique) => "DUPLICATE_ENTRY",
                _ => "STORE_ERROR",
            },
        }
    }

    /// Underlying error text, only for failures that were not classified
    pub fn detail(&self) -> Option<String> {
        match self {
            ApiError::Slot(SlotError::Transaction(reason)) => Some(reason.clone()),
            ApiError::Store(err) => match err.constraint_kind() {
                Some(ConstraintKind::ForeignKey) | Some(ConstraintKind::Unique) => None,
                _ => Some(err.to_string()),
            },
            _ => None,
        }
    }

    /// Count this error in the matching metric
    pub fn record(&self, metrics: &MetricsRegistry) {
        match self.status_code() {
            StatusCode::BAD_REQUEST => metrics.increment_validation_rejections(),
            StatusCode::CONFLICT => metrics.increment_conflicts(),
            StatusCode::NOT_FOUND => metrics.increment_not_found(),
            _ => metrics.increment_transaction_failures(),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::Validation(rejection.body_text())
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        ApiError::Validation(rejection.body_text())
    }
}

/// Error response body
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Stable code, e.g. `SLOT_NOT_FOUND`
    pub message: &'static str,
    /// HTTP status
    pub code: u16,
    /// Human-readable description
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

impl From<&ApiError> for ErrorResponse {
    fn from(err: &ApiError) -> Self {
        Self {
            message: err.code(),
            code: err.status_code().as_u16(),
            error: err.to_string(),
            detail: err.detail(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = Json(ErrorResponse::from(&self));
        (status, body).into_response()
    }
}
