//! Local stand-in for the catalog provider
//!
//! Serves the token endpoint under `/api/token` and the Web API under `/v1`
//! on an ephemeral port, counting requests so tests can assert caching.

use albumrate_common::config::CatalogConfig;
use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde_json::json;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Album id whose detail lists no artists
pub const ALBUM_WITHOUT_ARTISTS: &str = "noartists";
/// Album id for which the provider answers 500
pub const ALBUM_UPSTREAM_ERROR: &str = "broken";

#[derive(Clone)]
struct FakeState {
    expires_in: u64,
    token_requests: Arc<AtomicUsize>,
    artist_requests: Arc<AtomicUsize>,
    last_search_query: Arc<std::sync::Mutex<Option<HashMap<String, String>>>>,
}

/// Handle to a running fake catalog
pub struct FakeCatalog {
    pub base_url: String,
    pub token_requests: Arc<AtomicUsize>,
    pub artist_requests: Arc<AtomicUsize>,
    last_search_query: Arc<std::sync::Mutex<Option<HashMap<String, String>>>>,
}

impl FakeCatalog {
    /// Client config pointing at this fake, with credentials
    pub fn config(&self) -> CatalogConfig {
        CatalogConfig {
            client_id: Some("test-client".to_string()),
            client_secret: Some("test-secret".to_string()),
            api_base_url: format!("{}/v1", self.base_url),
            token_url: format!("{}/api/token", self.base_url),
            search_limit: 12,
            timeout_secs: 5,
        }
    }

    pub fn token_requests(&self) -> usize {
        self.token_requests.load(Ordering::SeqCst)
    }

    pub fn artist_requests(&self) -> usize {
        self.artist_requests.load(Ordering::SeqCst)
    }

    /// Query string of the most recent search request
    pub fn last_search_query(&self) -> Option<HashMap<String, String>> {
        self.last_search_query.lock().unwrap().clone()
    }
}

/// Start a fake catalog whose tokens expire after `expires_in` seconds
pub async fn spawn_fake_catalog(expires_in: u64) -> FakeCatalog {
    let state = FakeState {
        expires_in,
        token_requests: Arc::new(AtomicUsize::new(0)),
        artist_requests: Arc::new(AtomicUsize::new(0)),
        last_search_query: Arc::new(std::sync::Mutex::new(None)),
    };

    let app = Router::new()
        .route("/api/token", post(token))
        .route("/v1/search", get(search))
        .route("/v1/albums/:id", get(album))
        .route("/v1/artists/:id", get(artist))
        .with_state(state.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    FakeCatalog {
        base_url: format!("http://{}", addr),
        token_requests: state.token_requests,
        artist_requests: state.artist_requests,
        last_search_query: state.last_search_query,
    }
}

fn has_header_prefix(headers: &HeaderMap, prefix: &str) -> bool {
    headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.starts_with(prefix))
}

async fn token(State(state): State<FakeState>, headers: HeaderMap, body: String) -> Response {
    if !has_header_prefix(&headers, "Basic ") || !body.contains("grant_type=client_credentials") {
        return (StatusCode::BAD_REQUEST, Json(json!({"error": "invalid_client"}))).into_response();
    }

    let n = state.token_requests.fetch_add(1, Ordering::SeqCst) + 1;
    Json(json!({
        "access_token": format!("token-{}", n),
        "token_type": "Bearer",
        "expires_in": state.expires_in,
    }))
    .into_response()
}

async fn search(
    State(state): State<FakeState>,
    headers: HeaderMap,
    Query(query): Query<HashMap<String, String>>,
) -> Response {
    if !has_header_prefix(&headers, "Bearer ") {
        return StatusCode::UNAUTHORIZED.into_response();
    }
    *state.last_search_query.lock().unwrap() = Some(query);

    Json(json!({
        "albums": {
            "items": [
                {
                    "id": "1C2h7mLntPSeVYciMRTF4a",
                    "name": "Thriller",
                    "artists": [{"id": "3fMbdgg4jU18AjLCKBhRSm", "name": "Michael Jackson"}],
                    "release_date": "1982-11-30",
                    "images": [{"url": "https://img.example/thriller-640.jpg"}],
                    "external_urls": {"spotify": "https://open.example/album/1C2h7mLntPSeVYciMRTF4a"}
                },
                {
                    "id": "2ANVost0y2y52ema1E9xAZ",
                    "name": "Thriller 25",
                    "artists": [
                        {"id": "3fMbdgg4jU18AjLCKBhRSm", "name": "Michael Jackson"},
                        {"id": "0000000000000000000000", "name": "Guest"}
                    ],
                    "release_date": "2008-02-08",
                    "images": [],
                    "external_urls": {}
                }
            ]
        }
    }))
    .into_response()
}

async fn album(Path(id): Path<String>, headers: HeaderMap) -> Response {
    if !has_header_prefix(&headers, "Bearer ") {
        return StatusCode::UNAUTHORIZED.into_response();
    }
    if id == ALBUM_UPSTREAM_ERROR {
        return (StatusCode::INTERNAL_SERVER_ERROR, "upstream exploded").into_response();
    }

    let artists = if id == ALBUM_WITHOUT_ARTISTS {
        json!([])
    } else {
        json!([{"id": "artist1", "name": "Artist One"}])
    };

    Json(json!({
        "id": id,
        "name": "Some Album",
        "artists": artists,
        "tracks": {"items": [{"name": "Track 1"}]}
    }))
    .into_response()
}

async fn artist(State(state): State<FakeState>, Path(id): Path<String>, headers: HeaderMap) -> Response {
    if !has_header_prefix(&headers, "Bearer ") {
        return StatusCode::UNAUTHORIZED.into_response();
    }
    state.artist_requests.fetch_add(1, Ordering::SeqCst);

    Json(json!({
        "id": id,
        "images": [{"url": "https://img.example/artist-640.jpg"}]
    }))
    .into_response()
}
