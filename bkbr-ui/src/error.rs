//! Error types for bkbr-ui

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use bkbr_fetch::{ImageError, ImportError};
use serde_json::json;
use thiserror::Error;

/// API error type
#[derive(Debug, Error)]
pub enum ApiError {
    /// Resource not found (404)
    #[error("Resource not found: {0}")]
    NotFound(String),

    /// Invalid request (400)
    #[error("Invalid request: {0}")]
    BadRequest(String),

    /// Conflict (409) - a fetch is already running
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Scraping service or image host failed (502)
    #[error("Upstream error: {0}")]
    BadGateway(String),

    /// Internal server error (500)
    #[error("Internal server error: {0}")]
    Internal(String),

    /// Recipe store error
    #[error("Store error: {0}")]
    Store(#[from] bkbr_common::Error),
}

impl From<ImportError> for ApiError {
    fn from(err: ImportError) -> Self {
        if err.is_invalid_url() {
            return ApiError::BadRequest(err.to_string());
        }
        match err {
            ImportError::Busy => ApiError::Conflict(err.to_string()),
            ImportError::Scrape(e) => ApiError::BadGateway(e.to_string()),
            // Local disk trouble is ours, not the image host's
            ImportError::Image(e @ (ImageError::Io(_) | ImageError::InvalidFilename(_))) => {
                ApiError::Internal(e.to_string())
            }
            ImportError::Image(e) => ApiError::BadGateway(e.to_string()),
            ImportError::Store(e) => ApiError::Store(e),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_code) = match &self {
            ApiError::NotFound(_) => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            ApiError::BadRequest(_) => (StatusCode::BAD_REQUEST, "BAD_REQUEST"),
            ApiError::Conflict(_) => (StatusCode::CONFLICT, "CONFLICT"),
            ApiError::BadGateway(_) => (StatusCode::BAD_GATEWAY, "UPSTREAM_ERROR"),
            ApiError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
            ApiError::Store(_) => (StatusCode::INTERNAL_SERVER_ERROR, "STORE_ERROR"),
        };

        let message = match self {
            ApiError::NotFound(msg)
            | ApiError::BadRequest(msg)
            | ApiError::Conflict(msg)
            | ApiError::BadGateway(msg)
            | ApiError::Internal(msg) => msg,
            ApiError::Store(err) => err.to_string(),
        };

        let body = Json(json!({
            "error": {
                "code": error_code,
                "message": message,
            }
        }));

        (status, body).into_response()
    }
}

/// Result type for API handlers
pub type ApiResult<T> = Result<T, ApiError>;
