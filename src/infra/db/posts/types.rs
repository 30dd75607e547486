use time::OffsetDateTime;

use crate::domain::entities::PostRecord;
use crate::domain::types::PostId;

#[derive(sqlx::FromRow)]
pub(crate) struct PostRow {
    pub(crate) id: PostId,
    pub(crate) title: String,
    pub(crate) content: String,
    pub(crate) slug: String,
    pub(crate) created_at: OffsetDateTime,
    pub(crate) updated_at: OffsetDateTime,
}

impl From<PostRow> for PostRecord {
    fn from(row: PostRow) -> Self {
        Self {
            id: row.id,
            title: row.title,
            content: row.content,
            slug: row.slug,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}
