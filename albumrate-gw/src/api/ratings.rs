//! Rating endpoints
//!
//! GET /topalbums
//! POST /submitrating {id, name, newrating, artist, img}
//! GET /getratings?albumIds=<comma separated ids>[&albumIds=...]

use albumrate_common::db::{DisplayFields, RatingRecord};
use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Query, State,
    },
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use std::collections::BTreeMap;

use super::{json_body, query_params, required, MessageResponse};
use crate::db::ratings;
use crate::error::{ApiError, ApiResult};
use crate::AppState;

/// Number of albums on the home page "top albums" list
pub const TOP_ALBUMS_LIMIT: u32 = 3;

#[derive(Debug, Deserialize)]
pub struct SubmitRatingRequest {
    pub id: Option<String>,
    pub name: Option<String>,
    pub newrating: Option<f64>,
    pub artist: Option<String>,
    pub img: Option<String>,
}

/// Query keys carrying album ids for `/getratings` (plain and bracketed array form)
const ALBUM_IDS_PARAMS: [&str; 2] = ["albumIds", "albumIds[]"];

/// GET /topalbums
pub async fn top_albums(State(state): State<AppState>) -> ApiResult<Json<Vec<RatingRecord>>> {
    let records = ratings::top_rated(&state.db, TOP_ALBUMS_LIMIT).await?;
    Ok(Json(records))
}

/// POST /submitrating
pub async fn submit_rating(
    State(state): State<AppState>,
    payload: Result<Json<SubmitRatingRequest>, JsonRejection>,
) -> ApiResult<Json<MessageResponse>> {
    let request = json_body(payload)?;
    let id = required(request.id, "Missing album ID")?;
    let value = request
        .newrating
        .ok_or_else(|| ApiError::bad_request("Missing rating"))?;

    let display = DisplayFields {
        name: request.name,
        artist: request.artist,
        image: request.img,
    };

    ratings::submit_rating(&state.db, &id, &display, value).await?;

    Ok(MessageResponse::new("Rating updated successfully"))
}

/// GET /getratings
///
/// Ids come as a comma separated list, a repeated `albumIds` key, or both.
/// Unrated ids are left out of the returned object.
pub async fn get_ratings(
    State(state): State<AppState>,
    query: Result<Query<Vec<(String, String)>>, QueryRejection>,
) -> ApiResult<Json<BTreeMap<String, f64>>> {
    let params = query_params(query)?;
    let ids: Vec<String> = params
        .iter()
        .filter(|(key, _)| ALBUM_IDS_PARAMS.contains(&key.as_str()))
        .flat_map(|(_, value)| parse_id_list(value))
        .collect();
    if ids.is_empty() {
        return Err(ApiError::bad_request("No album IDs provided"));
    }

    let ratings = ratings::bulk_get_ratings(&state.db, &ids).await?;
    Ok(Json(ratings))
}

fn parse_id_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .map(str::to_string)
        .collect()
}

pub fn rating_routes() -> Router<AppState> {
    Router::new()
        .route("/topalbums", get(top_albums))
        .route("/submitrating", post(submit_rating))
        .route("/getratings", get(get_ratings))
}
