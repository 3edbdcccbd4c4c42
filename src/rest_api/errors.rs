//! # REST API Errors
//!
//! Error types for the REST API module.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;

use crate::observability::Event;
use crate::records::RecordError;
use crate::schema::{SchemaError, ValidationError};

/// Result type for REST operations
pub type RestResult<T> = Result<T, RestError>;

/// REST API errors
#[derive(Debug, Error)]
pub enum RestError {
    // ==================
    // Client Errors (4xx)
    // ==================
    /// Request body failed schema validation
    #[error("Request body failed schema validation with {} error(s)", .0.len())]
    ValidationFailed(Vec<ValidationError>),

    /// Invalid query parameter
    #[error("Invalid query parameter: {0}")]
    InvalidQueryParam(String),

    /// Invalid path segment
    #[error("Invalid path parameter: {0}")]
    InvalidPathParam(String),

    /// Request body is not JSON or does not fit the payload type
    #[error("Invalid request body: {0}")]
    InvalidBody(String),

    /// Record lifecycle or store error
    #[error("{0}")]
    Record(#[from] RecordError),

    // ==================
    // Server Errors (5xx)
    // ==================
    /// Schema resource missing or malformed
    #[error("{0}")]
    Schema(#[from] SchemaError),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl RestError {
    /// Get HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            // 400 Bad Request
            RestError::ValidationFailed(_) => StatusCode::BAD_REQUEST,
            RestError::InvalidQueryParam(_) => StatusCode::BAD_REQUEST,
            RestError::InvalidPathParam(_) => StatusCode::BAD_REQUEST,
            RestError::InvalidBody(_) => StatusCode::BAD_REQUEST,

            RestError::Record(err) => match err {
                RecordError::NotFound(_) | RecordError::ProfileNotFound(_) => StatusCode::NOT_FOUND,
                RecordError::AlreadyExists(_)
                | RecordError::Locked(_)
                | RecordError::Inactive(_)
                | RecordError::VersionConflict { .. }
                | RecordError::InvalidTransition(_) => StatusCode::CONFLICT,
                RecordError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },

            // 500 Internal Server Error
            RestError::Schema(_) => StatusCode::INTERNAL_SERVER_ERROR,
            RestError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Machine-readable error code
    pub fn code(&self) -> &'static str {
        match self {
            RestError::ValidationFailed(_) | RestError::InvalidBody(_) => "INVALID_REQUEST",
            RestError::InvalidQueryParam(_) => "INVALID_QUERY_PARAMETER",
            RestError::InvalidPathParam(_) => "INVALID_PATH_PARAMETER",
            RestError::Record(err) => match err {
                RecordError::NotFound(_) => "RECORD_NOT_FOUND",
                RecordError::ProfileNotFound(_) => "PROFILE_NOT_FOUND",
                RecordError::AlreadyExists(_) => "RECORD_ALREADY_EXISTS",
                RecordError::Locked(_) => "RECORD_LOCKED",
                RecordError::Inactive(_) => "RECORD_INACTIVE",
                RecordError::VersionConflict { .. } => "VERSION_CONFLICT",
                RecordError::InvalidTransition(_) => "INVALID_ACCREDITATION_TRANSITION",
                RecordError::Store(_) => "INTERNAL_ERROR",
            },
            RestError::Schema(err) => err.code().code(),
            RestError::Internal(_) => "INTERNAL_ERROR",
        }
    }
}

/// Error response body
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<Vec<ValidationError>>,
}

impl From<RestError> for ErrorResponse {
    fn from(err: RestError) -> Self {
        let code = err.code().to_string();
        let message = err.to_string();
        let errors = match err {
            RestError::ValidationFailed(errors) => Some(errors),
            _ => None,
        };
        Self { code, message, errors }
    }
}

impl IntoResponse for RestError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(event = %Event::RequestFailed, code = self.code(), error = %self);
        }
        let body = Json(ErrorResponse::from(self));
        (status, body).into_response()
    }
}
