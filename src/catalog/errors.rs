//! # Catalog Errors
//!
//! Error types for catalog queries and mutations.
//!
//! Every error maps to exactly one HTTP status and carries a single
//! human-readable message. Nothing here is retried.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;

/// Result type for catalog operations
pub type CatalogResult<T> = Result<T, CatalogError>;

/// Broad classification of a [`CatalogError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The request was rejected; no state changed
    Validation,
    /// The addressed record does not exist
    NotFound,
    /// The store could not be read or written
    Structural,
}

/// Catalog errors
#[derive(Debug, Clone, Error)]
pub enum CatalogError {
    // ==================
    // Validation (4xx)
    // ==================
    /// A required field is absent or empty
    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    /// Another record already uses this name (case-insensitive)
    #[error("Pokemon with name '{0}' already exists")]
    DuplicateName(String),

    /// Type value outside the fixed enumeration
    #[error("Invalid Pokemon type: {0}")]
    InvalidType(String),

    /// Same type listed twice
    #[error("Duplicate Pokemon type: {0}")]
    DuplicateType(String),

    /// More types than a record may carry
    #[error("A Pokemon can have at most {max} types, got {got}")]
    TooManyTypes { max: usize, got: usize },

    /// Update payload names a field outside the allow-list
    #[error("Field '{0}' is not allowed in an update")]
    DisallowedField(String),

    /// Body is not an object, or a field has the wrong JSON type
    #[error("Invalid request body: {0}")]
    InvalidBody(String),

    // ==================
    // Lookup (404)
    // ==================
    /// No record with the requested id
    #[error("Pokemon not found")]
    NotFound,

    // ==================
    // Structural (5xx)
    // ==================
    /// Store file unreadable, unwritable or of unexpected shape
    #[error("Store error: {0}")]
    Store(String),

    /// Lock poisoning and similar process-level faults
    #[error("Internal error: {0}")]
    Internal(String),
}

impl CatalogError {
    /// Store error with context
    pub fn store(msg: impl Into<String>) -> Self {
        Self::Store(msg.into())
    }

    /// Classify this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            CatalogError::MissingField(_)
            | CatalogError::DuplicateName(_)
            | CatalogError::InvalidType(_)
            | CatalogError::DuplicateType(_)
            | CatalogError::TooManyTypes { .. }
            | CatalogError::DisallowedField(_)
            | CatalogError::InvalidBody(_) => ErrorKind::Validation,
            CatalogError::NotFound => ErrorKind::NotFound,
            CatalogError::Store(_) | CatalogError::Internal(_) => ErrorKind::Structural,
        }
    }

    /// Get HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            // 409 Conflict
            CatalogError::DuplicateName(_) => StatusCode::CONFLICT,

            // 404 Not Found
            CatalogError::NotFound => StatusCode::NOT_FOUND,

            // 500 Internal Server Error
            CatalogError::Store(_) | CatalogError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }

            // 400 Bad Request
            _ => StatusCode::BAD_REQUEST,
        }
    }
}

/// Error response body
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub message: String,
    pub code: u16,
}

impl From<CatalogError> for ErrorResponse {
    fn from(err: CatalogError) -> Self {
        Self {
            code: err.status_code().as_u16(),
            message: err.to_string(),
        }
    }
}

impl IntoResponse for CatalogError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if self.kind() == ErrorKind::Structural {
            tracing::error!(error = %self, "catalog request failed");
        }
        let body = Json(ErrorResponse::from(self));
        (status, body).into_response()
    }
}
