//! Comment endpoints
//!
//! GET /getcomments?id=<album id>
//! POST /submitcomment {comment, id, date?}

use albumrate_common::db::CommentRecord;
use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Query, State,
    },
    routing::{get, post},
    Json, Router,
};
use chrono::{DateTime, Utc};
use serde::Deserialize;

use super::{json_body, query_params, required, MessageResponse};
use crate::db::comments;
use crate::error::{ApiError, ApiResult};
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct CommentsQuery {
    pub id: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SubmitCommentRequest {
    pub comment: Option<String>,
    pub id: Option<String>,
    /// RFC 3339 timestamp from the client; server time when omitted
    pub date: Option<String>,
}

/// GET /getcomments
///
/// Unknown ids return an empty list, not an error.
pub async fn get_comments(
    State(state): State<AppState>,
    query: Result<Query<CommentsQuery>, QueryRejection>,
) -> ApiResult<Json<Vec<CommentRecord>>> {
    let query = query_params(query)?;
    let id = required(query.id, "Missing album ID")?;
    let records = comments::list_comments(&state.db, &id).await?;
    Ok(Json(records))
}

/// POST /submitcomment
pub async fn submit_comment(
    State(state): State<AppState>,
    payload: Result<Json<SubmitCommentRequest>, JsonRejection>,
) -> ApiResult<Json<MessageResponse>> {
    let request = json_body(payload)?;
    let id = required(request.id, "Missing album ID")?;
    let comment = required(request.comment, "Comment must not be empty")?;
    let created_at = match request.date.as_deref() {
        Some(date) => parse_timestamp(date)?,
        None => Utc::now(),
    };

    comments::add_comment(&state.db, &id, &comment, created_at).await?;

    Ok(MessageResponse::new("Comment submitted successfully"))
}

fn parse_timestamp(date: &str) -> ApiResult<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(date.trim())
        .map(|d| d.with_timezone(&Utc))
        .map_err(|e| ApiError::bad_request_with("Invalid date", format!("{:?}: {}", date, e)))
}

pub fn comment_routes() -> Router<AppState> {
    Router::new()
        .route("/getcomments", get(get_comments))
        .route("/submitcomment", post(submit_comment))
}
