//! Catalog proxy endpoints
//!
//! POST /api {album, artist?}
//! POST /albumpage {albumId}

use axum::{
    extract::{rejection::JsonRejection, State},
    routing::post,
    Json, Router,
};
use serde::{Deserialize, Serialize};

use super::{json_body, required};
use crate::error::ApiResult;
use crate::services::{AlbumDetail, Release};
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct SearchRequest {
    pub album: Option<String>,
    pub artist: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct SearchResult {
    pub releases: Vec<Release>,
}

#[derive(Debug, Deserialize)]
pub struct AlbumPageRequest {
    #[serde(rename = "albumId")]
    pub album_id: Option<String>,
}

/// POST /api
pub async fn search_albums(
    State(state): State<AppState>,
    payload: Result<Json<SearchRequest>, JsonRejection>,
) -> ApiResult<Json<SearchResult>> {
    let request = json_body(payload)?;
    let album = required(request.album, "Missing album name")?;

    let releases = state.catalog.search(&album, request.artist.as_deref()).await?;

    Ok(Json(SearchResult { releases }))
}

/// POST /albumpage
pub async fn album_page(
    State(state): State<AppState>,
    payload: Result<Json<AlbumPageRequest>, JsonRejection>,
) -> ApiResult<Json<AlbumDetail>> {
    let request = json_body(payload)?;
    let album_id = required(request.album_id, "Missing album ID")?;

    let detail = state.catalog.get_album(album_id.trim()).await?;

    Ok(Json(detail))
}

pub fn catalog_routes() -> Router<AppState> {
    Router::new()
        .route("/api", post(search_albums))
        .route("/albumpage", post(album_page))
}
