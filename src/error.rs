// Error handling module
// Defines error types and HTTP response conversion

use std::path::PathBuf;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Failures of the durable store
#[derive(Error, Debug)]
pub enum StoreError {
    /// SQLite rejected a statement or the database could not be opened
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// The directory holding the database file could not be created
    #[error("Failed to create database directory {}: {source}", path.display())]
    Directory {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// API errors that can occur during request processing
#[derive(Error, Debug)]
pub enum ApiError {
    /// Caller is not authenticated (no user session, or login denied)
    #[error("Authentication failed: {0}")]
    AuthError(String),

    /// Request validation error
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// Requested resource does not exist
    #[error("{0}")]
    NotFound(String),

    /// Resource already exists
    #[error("{0}")]
    Conflict(String),

    /// Durable store unreachable or failed
    #[error("Storage error: {0}")]
    Storage(#[from] StoreError),

    /// Token exchange with the accounts service failed or returned a malformed body
    #[error("Upstream auth error: {0}")]
    UpstreamAuth(String),

    /// Transport failure calling the catalog API
    #[error("Upstream unavailable: {0}")]
    UpstreamUnavailable(String),

    /// Internal server error
    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl From<rusqlite::Error> for ApiError {
    fn from(err: rusqlite::Error) -> Self {
        ApiError::Storage(StoreError::Sqlite(err))
    }
}

impl ApiError {
    /// Short machine-readable category, also used in log fields
    pub fn error_type(&self) -> &'static str {
        match self {
            ApiError::AuthError(_) => "auth_error",
            ApiError::ValidationError(_) => "validation_error",
            ApiError::NotFound(_) => "not_found",
            ApiError::Conflict(_) => "conflict",
            ApiError::Storage(_) => "storage_error",
            ApiError::UpstreamAuth(_) => "upstream_auth_error",
            ApiError::UpstreamUnavailable(_) => "upstream_unavailable",
            ApiError::Internal(_) => "internal_error",
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let error_type = self.error_type();
        let (status, message) = match self {
            ApiError::AuthError(msg) => (StatusCode::UNAUTHORIZED, msg),
            ApiError::ValidationError(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            ApiError::Conflict(msg) => (StatusCode::CONFLICT, msg),
            ApiError::Storage(err) => {
                tracing::error!("Storage error: {}", err);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Storage error".to_string(),
                )
            }
            ApiError::UpstreamAuth(msg) => {
                tracing::error!("Spotify token exchange failed: {}", msg);
                (StatusCode::BAD_GATEWAY, msg)
            }
            ApiError::UpstreamUnavailable(msg) => {
                tracing::error!("Spotify API unavailable: {}", msg);
                (StatusCode::BAD_GATEWAY, msg)
            }
            ApiError::Internal(err) => {
                tracing::error!("Internal error: {:?}", err);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
        };

        let body = Json(json!({
            "message": message,
            "type": error_type,
        }));

        (status, body).into_response()
    }
}

/// Result type alias for API operations
pub type Result<T> = std::result::Result<T, ApiError>;
