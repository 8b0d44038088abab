//! Health check endpoint
//!
//! Probes the database with a trivial query and reports pool occupancy.

use axum::{extract::State, http::StatusCode, routing::get, Json, Router};
use chrono::Utc;
use serde::Serialize;

use crate::utils::PoolStats;
use crate::AppState;

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// "healthy" or "unhealthy"
    pub status: String,
    pub module: String,
    pub version: String,
    pub uptime_seconds: u64,
    /// "connected" or "disconnected"
    pub database: String,
    /// Database clock at probe time
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub pool: PoolStats,
    pub catalog_configured: bool,
}

/// GET /health
///
/// 200 when the probe query succeeds, 500 otherwise.
pub async fn health_check(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    let uptime = Utc::now().signed_duration_since(state.startup_time);
    let uptime_seconds = uptime.num_seconds().max(0) as u64;

    let probe = probe_database(&state).await;
    let pool = state.db.stats();

    let (status, response) = match probe {
        Ok(timestamp) => (
            StatusCode::OK,
            HealthResponse {
                status: "healthy".to_string(),
                module: "albumrate-gw".to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
                uptime_seconds,
                database: "connected".to_string(),
                timestamp: Some(timestamp),
                error: None,
                pool,
                catalog_configured: state.catalog.has_credentials(),
            },
        ),
        Err(e) => {
            tracing::error!(error = %e, "Health check failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                HealthResponse {
                    status: "unhealthy".to_string(),
                    module: "albumrate-gw".to_string(),
                    version: env!("CARGO_PKG_VERSION").to_string(),
                    uptime_seconds,
                    database: "disconnected".to_string(),
                    timestamp: None,
                    error: Some("Database unavailable".to_string()),
                    pool,
                    catalog_configured: state.catalog.has_credentials(),
                },
            )
        }
    };

    (status, Json(response))
}

async fn probe_database(state: &AppState) -> albumrate_common::Result<String> {
    let mut conn = state.db.acquire("health::probe").await?;
    let now: String = sqlx::query_scalar("SELECT strftime('%Y-%m-%dT%H:%M:%fZ', 'now')")
        .fetch_one(&mut *conn)
        .await?;
    Ok(now)
}

/// Build health check routes
pub fn health_routes() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}
