//! Error handling module for the Ogiri backend.
//!
//! Maps application errors to HTTP status codes and the `{"error": ...}` body.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::db::StoreError;

/// Application error type.
#[derive(Debug)]
pub enum AppError {
    /// A required field is missing or blank
    Validation(String),
    /// The request body could not be decoded
    BadRequest(String),
    /// Resource absent, or child not owned by the claimed parent
    NotFound(String),
    /// Answer submitted to an inactive theme
    InactiveResource(String),
    /// Store failure; the message is safe to show to clients
    Storage(String),
}

impl AppError {
    /// Convert a store error. `NotFound` keeps `not_found` as its message;
    /// anything else is logged and reported as `failure`.
    pub fn from_store(err: StoreError, not_found: &str, failure: &str) -> Self {
        match err {
            StoreError::NotFound => AppError::NotFound(not_found.to_string()),
            other => {
                tracing::error!("{}: {}", failure, other);
                AppError::Storage(failure.to_string())
            }
        }
    }

    /// Get the HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::InactiveResource(_) => StatusCode::BAD_REQUEST,
            AppError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the error message.
    pub fn message(&self) -> &str {
        match self {
            AppError::Validation(msg)
            | AppError::BadRequest(msg)
            | AppError::NotFound(msg)
            | AppError::InactiveResource(msg)
            | AppError::Storage(msg) => msg.as_str(),
        }
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.status_code(), self.message())
    }
}

impl std::error::Error for AppError {}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        tracing::debug!("Rejected request body: {}", err);
        AppError::BadRequest("Invalid request body".to_string())
    }
}

/// Error response body.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = ErrorResponse {
            error: self.message().to_string(),
        };
        (status, Json(body)).into_response()
    }
}
