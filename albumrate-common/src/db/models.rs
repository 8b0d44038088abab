//! Persisted record models

use serde::{Deserialize, Serialize};

/// Aggregate reception of one catalog item (`ratings` row)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct RatingRecord {
    /// Catalog item identifier
    pub id: String,
    pub name: Option<String>,
    pub artist: Option<String>,
    pub image: Option<String>,
    /// Running mean of every submitted rating
    pub rating: f64,
    /// Number of submissions folded into `rating`
    pub count: i64,
}

/// Display metadata stored with the first rating of an item
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DisplayFields {
    pub name: Option<String>,
    pub artist: Option<String>,
    pub image: Option<String>,
}

/// One anonymous comment on a catalog item (`usercomments` row)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct CommentRecord {
    pub id: String,
    pub usercomment: String,
    /// RFC 3339 UTC timestamp
    pub created_at: String,
}
