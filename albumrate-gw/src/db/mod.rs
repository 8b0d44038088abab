//! Database access layer for albumrate-gw
//!
//! Stores take the monitored pool handle owned by the gateway; each call
//! acquires one connection for its single statement.

pub mod comments;
pub mod ratings;

use albumrate_common::config::DatabaseConfig;
use anyhow::{Context, Result};

use crate::utils::MonitoredPool;

/// Open the pool, create tables, and wrap it for monitoring
pub async fn open(config: &DatabaseConfig) -> Result<MonitoredPool> {
    let pool = albumrate_common::db::init_database(config)
        .await
        .with_context(|| format!("Failed to open database at {}", config.url))?;
    Ok(MonitoredPool::new(pool))
}
