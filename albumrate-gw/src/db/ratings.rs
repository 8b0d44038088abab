//! Rating store
//!
//! One row per rated catalog item holding the running mean and sample count.
//! The write path is a single upsert statement: SQLite serializes writers, so
//! concurrent submissions for the same item cannot lose updates.

use albumrate_common::db::{DisplayFields, RatingRecord};
use albumrate_common::{Error, Result};
use sqlx::{QueryBuilder, Sqlite};
use std::collections::{BTreeMap, BTreeSet};

use crate::utils::MonitoredPool;

/// Highest accepted rating
pub const MAX_RATING: f64 = 5.0;

/// Check a submitted rating: finite, within [0, 5], in half steps
pub fn validate_rating(value: f64) -> Result<()> {
    if !value.is_finite() || !(0.0..=MAX_RATING).contains(&value) {
        return Err(Error::InvalidInput(format!(
            "rating must be between 0 and {}, got {}",
            MAX_RATING, value
        )));
    }
    if (value * 2.0).fract() != 0.0 {
        return Err(Error::InvalidInput(format!(
            "rating must be a multiple of 0.5, got {}",
            value
        )));
    }
    Ok(())
}

/// Point lookup; `None` means the item has never been rated
pub async fn get_rating(pool: &MonitoredPool, id: &str) -> Result<Option<RatingRecord>> {
    let id = id.trim();
    let mut conn = pool.acquire("ratings::get_rating").await?;

    let record = sqlx::query_as::<_, RatingRecord>(
        "SELECT id, name, artist, image, rating, count FROM ratings WHERE id = ?",
    )
    .bind(id)
    .fetch_optional(&mut *conn)
    .await?;

    Ok(record)
}

/// Current average for each rated id in `ids`
///
/// Unrated ids are omitted, never reported as zero. Blank and duplicate ids
/// are ignored; an empty set returns without querying.
pub async fn bulk_get_ratings(pool: &MonitoredPool, ids: &[String]) -> Result<BTreeMap<String, f64>> {
    let unique: BTreeSet<&str> = ids
        .iter()
        .map(|id| id.trim())
        .filter(|id| !id.is_empty())
        .collect();

    if unique.is_empty() {
        return Ok(BTreeMap::new());
    }

    let mut builder = QueryBuilder::<Sqlite>::new("SELECT id, rating FROM ratings WHERE id IN (");
    let mut separated = builder.separated(", ");
    for id in &unique {
        separated.push_bind(*id);
    }
    separated.push_unseparated(")");

    let mut conn = pool.acquire("ratings::bulk_get_ratings").await?;
    let rows: Vec<(String, f64)> = builder.build_query_as().fetch_all(&mut *conn).await?;

    Ok(rows.into_iter().collect())
}

/// Highest rated items, ties broken by number of ratings
pub async fn top_rated(pool: &MonitoredPool, limit: u32) -> Result<Vec<RatingRecord>> {
    let mut conn = pool.acquire("ratings::top_rated").await?;

    let records = sqlx::query_as::<_, RatingRecord>(
        r#"
        SELECT id, name, artist, image, rating, count
        FROM ratings
        ORDER BY rating DESC, count DESC, id ASC
        LIMIT ?
        "#,
    )
    .bind(i64::from(limit))
    .fetch_all(&mut *conn)
    .await?;

    Ok(records)
}

/// Fold one rating into the item's running mean
///
/// The first submission inserts the row with `count = 1` and the display
/// fields; later submissions only touch `rating` and `count`. The new mean is
/// computed in the statement as `rating + (new - rating) / (count + 1)`.
pub async fn submit_rating(
    pool: &MonitoredPool,
    id: &str,
    display: &DisplayFields,
    new_value: f64,
) -> Result<RatingRecord> {
    // Ids are keyed trimmed everywhere so lookups agree with bulk lookups
    let id = id.trim();
    if id.is_empty() {
        return Err(Error::InvalidInput("album id must not be empty".to_string()));
    }
    validate_rating(new_value)?;

    let mut conn = pool.acquire("ratings::submit_rating").await?;

    // Clamped so float rounding can never trip the CHECK constraint
    let record = sqlx::query_as::<_, RatingRecord>(
        r#"
        INSERT INTO ratings (id, name, artist, image, rating, count)
        VALUES (?, ?, ?, ?, ?, 1)
        ON CONFLICT(id) DO UPDATE SET
            rating = MIN(5.0, MAX(0.0,
                ratings.rating + (excluded.rating - ratings.rating) / (ratings.count + 1))),
            count = ratings.count + 1
        RETURNING id, name, artist, image, rating, count
        "#,
    )
    .bind(id)
    .bind(&display.name)
    .bind(&display.artist)
    .bind(&display.image)
    .bind(new_value)
    .fetch_one(&mut *conn)
    .await?;

    tracing::info!(
        id = %record.id,
        submitted = new_value,
        rating = record.rating,
        count = record.count,
        "Rating submitted"
    );

    Ok(record)
}
