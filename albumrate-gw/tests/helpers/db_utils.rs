//! Database and application test utilities

use albumrate_common::config::{CatalogConfig, DatabaseConfig};
use albumrate_gw::services::CatalogClient;
use albumrate_gw::utils::MonitoredPool;
use albumrate_gw::{build_router, AppState};
use axum::Router;
use std::sync::Arc;
use tempfile::TempDir;

/// Create a file-backed test database with tables created
///
/// Returns (TempDir, MonitoredPool) - TempDir must be kept alive for duration of test
pub async fn create_test_db(max_connections: u32) -> (TempDir, MonitoredPool) {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let config = DatabaseConfig {
        url: format!("sqlite://{}", temp_dir.path().join("test_albumrate.db").display()),
        max_connections,
        ..DatabaseConfig::default()
    };

    let pool = albumrate_gw::db::open(&config)
        .await
        .expect("Failed to open test database");

    (temp_dir, pool)
}

/// Router over a fresh database and a catalog client built from `catalog`
pub async fn test_app(catalog: CatalogConfig) -> (TempDir, MonitoredPool, Router) {
    let (temp_dir, pool) = create_test_db(4).await;
    let client = CatalogClient::new(catalog).expect("Failed to create catalog client");
    let state = AppState::new(pool.clone(), Arc::new(client));
    (temp_dir, pool, build_router(state))
}
