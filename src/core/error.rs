//! Error type system for FinLedger
//!
//! This module provides the error taxonomy for the auth and ledger flows:
//! - Recoverable user-input failures (validation, duplicate email)
//! - Credential failures that must not disclose which check failed
//! - Store/IO failures that are request-fatal but never process-fatal
//! - HTTP status code mapping and JSON error responses with trace IDs

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Main error type for the FinLedger system
#[derive(Debug, thiserror::Error)]
pub enum LedgerError {
    // System-level errors
    #[error("System initialization failed: {0}")]
    InitializationError(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    // Store errors (SQLite connectivity/query failures)
    #[error("Store error: {0}")]
    StoreError(#[from] rusqlite::Error),

    // Auth-flow errors
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// Registration against an already-taken email. Registration
    /// deliberately discloses this; login never does.
    #[error("Email already exists.")]
    DuplicateEmail,

    /// Unknown email and wrong password collapse into this one variant so
    /// the two cases are indistinguishable to the caller.
    #[error("Invalid email or password.")]
    InvalidCredentials,

    #[error("Authentication required")]
    AuthenticationRequired,

    /// Internal hashing failure (bad cost, malformed stored hash). Never
    /// surfaced verbatim to the user.
    #[error("Password hashing failed: {0}")]
    HashError(String),

    // API-related errors
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Resource not found: {0}")]
    NotFound(String),

    // I/O errors
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    // Blocking-pool errors
    #[error("Task error: {0}")]
    TaskError(String),
}

impl LedgerError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            // 400 Bad Request
            LedgerError::ValidationError(_)
            | LedgerError::DuplicateEmail
            | LedgerError::InvalidRequest(_) => StatusCode::BAD_REQUEST,

            // 401 Unauthorized
            LedgerError::InvalidCredentials | LedgerError::AuthenticationRequired => {
                StatusCode::UNAUTHORIZED
            }

            // 404 Not Found
            LedgerError::NotFound(_) => StatusCode::NOT_FOUND,

            // 500 Internal Server Error
            LedgerError::InitializationError(_)
            | LedgerError::ConfigError(_)
            | LedgerError::StoreError(_)
            | LedgerError::HashError(_)
            | LedgerError::IoError(_)
            | LedgerError::TaskError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the error type name for API responses
    pub fn error_type(&self) -> &'static str {
        match self {
            LedgerError::InitializationError(_) => "InitializationError",
            LedgerError::ConfigError(_) => "ConfigError",
            LedgerError::StoreError(_) => "StoreError",
            LedgerError::ValidationError(_) => "ValidationError",
            LedgerError::DuplicateEmail => "DuplicateEmail",
            LedgerError::InvalidCredentials => "InvalidCredentials",
            LedgerError::AuthenticationRequired => "AuthenticationRequired",
            LedgerError::HashError(_) => "HashError",
            LedgerError::InvalidRequest(_) => "InvalidRequest",
            LedgerError::NotFound(_) => "NotFound",
            LedgerError::IoError(_) => "IoError",
            LedgerError::TaskError(_) => "TaskError",
        }
    }

    /// Check if this error is recoverable by re-prompting the user
    pub fn is_user_recoverable(&self) -> bool {
        matches!(
            self,
            LedgerError::ValidationError(_)
                | LedgerError::DuplicateEmail
                | LedgerError::InvalidCredentials
        )
    }
}

/// Error response structure for API endpoints
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Error type identifier
    pub error: String,
    /// Human-readable error message
    pub message: String,
    /// Unique trace ID for this error
    pub trace_id: String,
}

impl ErrorResponse {
    /// Create a new error response with a generated trace ID
    pub fn new(error: String, message: String) -> Self {
        Self {
            error,
            message,
            trace_id: Uuid::new_v4().to_string(),
        }
    }

    /// Create an error response from a LedgerError
    pub fn from_error(error: &LedgerError) -> Self {
        Self::new(error.error_type().to_string(), error.to_string())
    }
}

/// Implement IntoResponse for LedgerError to enable automatic error handling in Axum
impl IntoResponse for LedgerError {
    fn into_response(self) -> Response {
        let status_code = self.status_code();
        let error_response = ErrorResponse::from_error(&self);

        tracing::error!(
            error_type = self.error_type(),
            trace_id = %error_response.trace_id,
            status_code = %status_code,
            "Request failed: {}",
            self
        );

        (status_code, Json(error_response)).into_response()
    }
}

/// Result type alias for operations that can fail with LedgerError
pub type Result<T> = std::result::Result<T, LedgerError>;
