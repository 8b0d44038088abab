//! Error types for albumrate-gw
//!
//! Client input errors map to 400 with a message and optional details.
//! Catalog and store failures map to 500 with an opaque message; the full
//! error is only written to the server log.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

use crate::services::CatalogError;

/// API error type
#[derive(Debug, Error)]
pub enum ApiError {
    /// Missing or malformed request field (400)
    #[error("Invalid request: {message}")]
    BadRequest {
        message: String,
        details: Option<String>,
    },

    /// Upstream catalog failure (500, or 400 for an invalid id)
    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),

    /// Store or configuration failure (500, or 400 for invalid input)
    #[error("Common error: {0}")]
    Common(#[from] albumrate_common::Error),
}

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        ApiError::BadRequest {
            message: message.into(),
            details: None,
        }
    }

    pub fn bad_request_with(message: impl Into<String>, details: impl Into<String>) -> Self {
        ApiError::BadRequest {
            message: message.into(),
            details: Some(details.into()),
        }
    }
}

/// JSON error body: `{"error": ..., "details": ...}`
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error, details) = match self {
            ApiError::BadRequest { message, details } => {
                (StatusCode::BAD_REQUEST, message, details)
            }
            ApiError::Catalog(CatalogError::InvalidId(id)) => (
                StatusCode::BAD_REQUEST,
                "Invalid album ID".to_string(),
                Some(format!("{:?} is not a catalog id", id)),
            ),
            ApiError::Catalog(err) => {
                tracing::error!(error = %err, "Catalog request failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Catalog unavailable".to_string(),
                    None,
                )
            }
            ApiError::Common(albumrate_common::Error::InvalidInput(msg)) => {
                (StatusCode::BAD_REQUEST, "Invalid input".to_string(), Some(msg))
            }
            ApiError::Common(err) => {
                tracing::error!(error = %err, "Store operation failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                    None,
                )
            }
        };

        if status.is_client_error() {
            tracing::debug!(status = status.as_u16(), error = %error, "Rejected request");
        }

        (status, Json(ErrorBody { error, details })).into_response()
    }
}

/// Result type for API handlers
pub type ApiResult<T> = Result<T, ApiError>;
