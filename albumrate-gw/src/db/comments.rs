//! Comment store
//!
//! Append-only: comments are never updated or deleted. Listing is ordered by
//! `created_at` ascending, then by insertion order.

use albumrate_common::db::CommentRecord;
use albumrate_common::{Error, Result};
use chrono::{DateTime, SecondsFormat, Utc};

use crate::utils::MonitoredPool;

/// All comments for an item, oldest first; unknown ids yield an empty list
pub async fn list_comments(pool: &MonitoredPool, id: &str) -> Result<Vec<CommentRecord>> {
    let id = id.trim();
    let mut conn = pool.acquire("comments::list_comments").await?;

    let comments = sqlx::query_as::<_, CommentRecord>(
        r#"
        SELECT id, usercomment, created_at
        FROM usercomments
        WHERE id = ?
        ORDER BY created_at ASC, comment_id ASC
        "#,
    )
    .bind(id)
    .fetch_all(&mut *conn)
    .await?;

    Ok(comments)
}

/// Append a comment
///
/// Rejects a blank item id or whitespace-only text. The id is stored
/// trimmed; the text is stored as submitted.
pub async fn add_comment(
    pool: &MonitoredPool,
    id: &str,
    text: &str,
    created_at: DateTime<Utc>,
) -> Result<()> {
    let id = id.trim();
    if id.is_empty() {
        return Err(Error::InvalidInput("album id must not be empty".to_string()));
    }
    if text.trim().is_empty() {
        return Err(Error::InvalidInput("comment must not be empty".to_string()));
    }

    let mut conn = pool.acquire("comments::add_comment").await?;

    // Fixed-width UTC text so lexical order is chronological
    let timestamp = created_at.to_rfc3339_opts(SecondsFormat::Millis, true);

    sqlx::query("INSERT INTO usercomments (id, usercomment, created_at) VALUES (?, ?, ?)")
        .bind(id)
        .bind(text)
        .bind(&timestamp)
        .execute(&mut *conn)
        .await?;

    tracing::info!(id = %id, created_at = %timestamp, "Comment added");

    Ok(())
}
