//! HTTP API handlers for albumrate-gw

pub mod catalog;
pub mod comments;
pub mod health;
pub mod ratings;

pub use catalog::catalog_routes;
pub use comments::comment_routes;
pub use health::health_routes;
pub use ratings::rating_routes;

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::Query;
use axum::Json;
use serde::Serialize;

use crate::error::{ApiError, ApiResult};

/// `{"message": ...}` acknowledgement for write endpoints
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Json<Self> {
        Json(Self {
            message: message.into(),
        })
    }
}

/// Unwrap a JSON body, reporting malformed input as a JSON 400
pub(crate) fn json_body<T>(payload: Result<Json<T>, JsonRejection>) -> ApiResult<T> {
    payload
        .map(|Json(body)| body)
        .map_err(|rejection| ApiError::bad_request_with("Invalid JSON body", rejection.body_text()))
}

/// Unwrap a query string, reporting undecodable input as a JSON 400
pub(crate) fn query_params<T>(query: Result<Query<T>, QueryRejection>) -> ApiResult<T> {
    query
        .map(|Query(params)| params)
        .map_err(|rejection| ApiError::bad_request_with("Invalid query string", rejection.body_text()))
}

/// Required string field: present and not blank
pub(crate) fn required(value: Option<String>, message: &str) -> ApiResult<String> {
    value
        .filter(|v| !v.trim().is_empty())
        .ok_or_else(|| ApiError::bad_request(message))
}
