use serde::Serialize;
use time::{
    OffsetDateTime, UtcOffset, format_description::BorrowedFormatItem, macros::format_description,
};

use crate::domain::entities::PostRecord;

use super::markup::{DEFAULT_EXCERPT_LENGTH, excerpt, read_time, tags};

const DISPLAY_DATE_FORMAT: &[BorrowedFormatItem<'static>] =
    format_description!("[year]-[month]-[day]");

/// Every stored post counts as published; there is no draft state.
pub const PUBLISHED_STATUS: &str = "Published";

/// Public listing entry: the post plus derived display fields.
#[derive(Debug, Clone, Serialize)]
pub struct PostCard {
    #[serde(flatten)]
    pub post: PostRecord,
    pub excerpt: String,
    pub read_time: String,
    pub tags: Vec<String>,
    pub date: String,
}

impl From<PostRecord> for PostCard {
    fn from(post: PostRecord) -> Self {
        Self {
            excerpt: excerpt(&post.content, DEFAULT_EXCERPT_LENGTH),
            read_time: read_time(&post.content),
            tags: tags(&post.content),
            date: display_date(post.created_at),
            post,
        }
    }
}

/// Row in the admin post table.
#[derive(Debug, Clone, Serialize)]
pub struct AdminPostRow {
    #[serde(flatten)]
    pub post: PostRecord,
    pub status: &'static str,
    pub views: u64,
    pub date: String,
}

impl From<PostRecord> for AdminPostRow {
    fn from(post: PostRecord) -> Self {
        Self {
            status: PUBLISHED_STATUS,
            views: 0,
            date: display_date(post.created_at),
            post,
        }
    }
}

/// `YYYY-MM-DD` in UTC.
pub fn display_date(at: OffsetDateTime) -> String {
    at.to_offset(UtcOffset::UTC)
        .format(DISPLAY_DATE_FORMAT)
        .expect("valid calendar date")
}
