//! Database initialization
//!
//! Opens the connection pool with the configured limits and creates the
//! `ratings` and `usercomments` tables if they do not exist yet.

use crate::config::DatabaseConfig;
use crate::Result;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::str::FromStr;
use std::time::Duration;
use tracing::info;

/// Open the connection pool and create tables if needed
pub async fn init_database(config: &DatabaseConfig) -> Result<SqlitePool> {
    let pool = connect_pool(config).await?;
    init_tables(&pool).await?;
    Ok(pool)
}

/// Open a bounded connection pool
///
/// WAL mode lets readers proceed while a rating upsert holds the write lock;
/// the busy timeout makes competing writers wait instead of failing.
pub async fn connect_pool(config: &DatabaseConfig) -> Result<SqlitePool> {
    let options = SqliteConnectOptions::from_str(&config.url)?
        .create_if_missing(true)
        .journal_mode(SqliteJournalMode::Wal)
        .busy_timeout(Duration::from_millis(config.busy_timeout_ms))
        .foreign_keys(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(config.max_connections)
        .min_connections(config.min_connections)
        .acquire_timeout(Duration::from_secs(config.acquire_timeout_secs))
        .idle_timeout(Some(Duration::from_secs(config.idle_timeout_secs)))
        .connect_with(options)
        .await?;

    info!(
        url = %config.url,
        max_connections = config.max_connections,
        acquire_timeout_secs = config.acquire_timeout_secs,
        "Database pool opened"
    );

    Ok(pool)
}

/// Create all albumrate tables (idempotent)
pub async fn init_tables(pool: &SqlitePool) -> Result<()> {
    create_ratings_table(pool).await?;
    create_comments_table(pool).await?;

    info!("Database tables initialized (ratings, usercomments)");
    Ok(())
}

/// One row per rated catalog item: running average plus sample count
pub async fn create_ratings_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS ratings (
            id TEXT PRIMARY KEY,
            name TEXT,
            artist TEXT,
            image TEXT,
            rating REAL NOT NULL CHECK (rating >= 0.0 AND rating <= 5.0),
            count INTEGER NOT NULL CHECK (count >= 1)
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        "CREATE INDEX IF NOT EXISTS idx_ratings_rating_count ON ratings(rating DESC, count DESC)",
    )
    .execute(pool)
    .await?;

    Ok(())
}

/// Append-only comments; `comment_id` orders comments sharing a timestamp
pub async fn create_comments_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS usercomments (
            comment_id INTEGER PRIMARY KEY AUTOINCREMENT,
            id TEXT NOT NULL,
            usercomment TEXT NOT NULL,
            created_at TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        "CREATE INDEX IF NOT EXISTS idx_usercomments_id_created ON usercomments(id, created_at)",
    )
    .execute(pool)
    .await?;

    Ok(())
}
