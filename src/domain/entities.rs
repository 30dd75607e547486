//! Domain entities mirrored from persistent storage.

use serde::Serialize;
use time::OffsetDateTime;

use crate::domain::types::PostId;

/// A stored blog article.
///
/// `slug` is unique across all stored posts and `created_at <= updated_at`
/// holds for every record a store hands out.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PostRecord {
    pub id: PostId,
    pub title: String,
    pub content: String,
    pub slug: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}
