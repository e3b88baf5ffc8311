//! Error handling module for the Obras backend.
//!
//! Provides centralized error types with mapping to HTTP status codes and response envelopes.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::models::FieldError;

/// Error codes as constants to avoid stringly-typed errors.
pub mod codes {
    pub const UNAUTHORIZED: &str = "UNAUTHORIZED";
    pub const NOT_FOUND: &str = "NOT_FOUND";
    pub const VALIDATION_ERROR: &str = "VALIDATION_ERROR";
    pub const DUPLICATE_IDENTIFIER: &str = "DUPLICATE_IDENTIFIER";
    pub const EDIT_CONFLICT: &str = "EDIT_CONFLICT";
    pub const STORE_UNAVAILABLE: &str = "STORE_UNAVAILABLE";
    pub const INTERNAL_ERROR: &str = "INTERNAL_ERROR";
}

/// Application error type.
#[derive(Debug)]
pub enum AppError {
    /// Authentication or identity required
    Unauthorized(String),
    /// Resource not found
    NotFound(String),
    /// Field-level validation failures, caught before any store call
    Validation(Vec<FieldError>),
    /// Checklist number collision on creation
    DuplicateIdentifier { checklist_id: String },
    /// Stale edit rejected under the reject-stale conflict policy
    EditConflict { current_modified_at: String },
    /// Transient store failure; the caller may retry
    Store(String),
    /// Internal server error
    Internal(String),
}

impl AppError {
    /// Get the HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::DuplicateIdentifier { .. } => StatusCode::CONFLICT,
            AppError::EditConflict { .. } => StatusCode::CONFLICT,
            AppError::Store(_) => StatusCode::SERVICE_UNAVAILABLE,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the error code for this error.
    pub fn error_code(&self) -> &'static str {
        match self {
            AppError::Unauthorized(_) => codes::UNAUTHORIZED,
            AppError::NotFound(_) => codes::NOT_FOUND,
            AppError::Validation(_) => codes::VALIDATION_ERROR,
            AppError::DuplicateIdentifier { .. } => codes::DUPLICATE_IDENTIFIER,
            AppError::EditConflict { .. } => codes::EDIT_CONFLICT,
            AppError::Store(_) => codes::STORE_UNAVAILABLE,
            AppError::Internal(_) => codes::INTERNAL_ERROR,
        }
    }

    /// Get the error message.
    pub fn message(&self) -> String {
        match self {
            AppError::Unauthorized(msg) => msg.clone(),
            AppError::NotFound(msg) => msg.clone(),
            AppError::Validation(fields) => {
                format!("Validation failed for {} field(s)", fields.len())
            }
            AppError::DuplicateIdentifier { checklist_id } => format!(
                "Checklist {} already exists; the number was taken by a concurrent creation",
                checklist_id
            ),
            AppError::EditConflict { .. } => {
                "Checklist was modified by someone else since it was loaded".to_string()
            }
            AppError::Store(msg) => msg.clone(),
            AppError::Internal(msg) => msg.clone(),
        }
    }

    /// Machine-readable details attached to the response envelope.
    fn details(&self) -> Option<serde_json::Value> {
        match self {
            AppError::Validation(fields) => Some(serde_json::json!({ "fields": fields })),
            AppError::DuplicateIdentifier { checklist_id } => {
                Some(serde_json::json!({ "checklistId": checklist_id }))
            }
            AppError::EditConflict {
                current_modified_at,
            } => Some(serde_json::json!({ "currentModifiedAt": current_modified_at })),
            _ => None,
        }
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.error_code(), self.message())
    }
}

impl std::error::Error for AppError {}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        tracing::error!("Store error: {:?}", err);
        AppError::Store(format!("Store unavailable: {}", err))
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        tracing::error!("Stored document decode error: {:?}", err);
        AppError::Internal(format!("Stored document could not be decoded: {}", err))
    }
}

/// Error details in the response envelope.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorDetails {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

/// Error response envelope.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorResponse {
    pub success: bool,
    pub error: ErrorDetails,
}

impl ErrorResponse {
    pub fn new(error: &AppError) -> Self {
        Self {
            success: false,
            error: ErrorDetails {
                code: error.error_code().to_string(),
                message: error.message(),
                details: error.details(),
            },
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = ErrorResponse::new(&self);
        (status, Json(body)).into_response()
    }
}
