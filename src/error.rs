// SPDX-License-Identifier: MIT

//! Application error types with consistent API responses.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

/// Application error type that converts to HTTP responses.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Authentication required")]
    Unauthorized,

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Invalid request: {0}")]
    BadRequest(String),

    /// A submission guard rejected the request. User-input error, nothing
    /// was persisted.
    #[error("Submission blocked: {0}")]
    Blocked(String),

    /// The record store is out of space and the configured quota policy did
    /// not recover. The composed record was not persisted; retry is allowed.
    #[error("Storage full: {0}")]
    StorageFull(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl From<crate::db::store::LedgerError> for AppError {
    fn from(e: crate::db::store::LedgerError) -> Self {
        use crate::db::store::LedgerError;
        match e {
            LedgerError::StorageFull => AppError::StorageFull(e.to_string()),
            LedgerError::Storage(msg) => AppError::Storage(msg),
        }
    }
}

impl From<crate::services::submission::SubmissionError> for AppError {
    fn from(e: crate::services::submission::SubmissionError) -> Self {
        use crate::services::submission::SubmissionError;
        match e {
            SubmissionError::Blocked(reason) => AppError::Blocked(reason.to_string()),
            SubmissionError::Storage(err) => err.into(),
        }
    }
}

/// JSON error response body
#[derive(Serialize)]
struct ErrorResponse {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<String>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error, details) = match &self {
            AppError::Unauthorized => (StatusCode::UNAUTHORIZED, "unauthorized", None),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "not_found", Some(msg.clone())),
            AppError::BadRequest(msg) => {
                (StatusCode::BAD_REQUEST, "bad_request", Some(msg.clone()))
            }
            AppError::Blocked(msg) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "blocked",
                Some(msg.clone()),
            ),
            AppError::StorageFull(msg) => (
                StatusCode::INSUFFICIENT_STORAGE,
                "storage_full",
                Some(msg.clone()),
            ),
            AppError::Storage(msg) => {
                tracing::error!(error = %msg, "Storage error");
                (StatusCode::INTERNAL_SERVER_ERROR, "storage_error", None)
            }
            AppError::Internal(err) => {
                tracing::error!(error = %err, "Internal server error");
                (StatusCode::INTERNAL_SERVER_ERROR, "internal_error", None)
            }
        };

        let body = ErrorResponse {
            error: error.to_string(),
            details,
        };

        (status, Json(body)).into_response()
    }
}

/// Result type alias for handlers
pub type Result<T> = std::result::Result<T, AppError>;
