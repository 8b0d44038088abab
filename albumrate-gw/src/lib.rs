//! albumrate-gw library - HTTP gateway for album ratings and comments
//!
//! Routes requests to the rating store, the comment store, and the music
//! catalog client. The gateway owns no state of its own beyond the resource
//! handles passed to [`AppState::new`].

use axum::Router;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub mod api;
pub mod db;
pub mod error;
pub mod services;
pub mod utils;

pub use crate::error::{ApiError, ApiResult};

use crate::services::CatalogClient;
use crate::utils::MonitoredPool;

/// Application state shared across HTTP handlers
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub db: MonitoredPool,
    /// Music catalog client (caches its bearer token)
    pub catalog: Arc<CatalogClient>,
    /// Service startup timestamp for uptime tracking
    pub startup_time: DateTime<Utc>,
}

impl AppState {
    pub fn new(db: MonitoredPool, catalog: Arc<CatalogClient>) -> Self {
        Self {
            db,
            catalog,
            startup_time: Utc::now(),
        }
    }
}

/// Build application router
///
/// CORS is open to all origins; the browser client is served from elsewhere.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .merge(api::comment_routes())
        .merge(api::rating_routes())
        .merge(api::catalog_routes())
        .merge(api::health_routes())
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
