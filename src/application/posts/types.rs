use thiserror::Error;

use crate::application::repos::RepoError;
use crate::domain::slug::SlugError;
use crate::domain::types::PostId;

pub const POSTS_CREATED_METRIC: &str = "scriptorium_posts_created_total";
pub const POSTS_UPDATED_METRIC: &str = "scriptorium_posts_updated_total";
pub const POSTS_DELETED_METRIC: &str = "scriptorium_posts_deleted_total";
pub const POST_SLUG_CONFLICTS_METRIC: &str = "scriptorium_post_slug_conflicts_total";

#[derive(Debug, Error)]
pub enum PostServiceError {
    #[error("invalid `{field}`: {reason}")]
    Validation { field: &'static str, reason: String },
    #[error("slug `{slug}` already exists")]
    Conflict { slug: String },
    #[error("post not found")]
    NotFound,
    #[error(transparent)]
    Storage(RepoError),
}

impl PostServiceError {
    pub(crate) fn missing(field: &'static str) -> Self {
        Self::Validation {
            field,
            reason: "must not be empty".to_string(),
        }
    }

    pub(crate) fn invalid_slug(err: SlugError) -> Self {
        Self::Validation {
            field: "slug",
            reason: err.to_string(),
        }
    }

    /// Translate a failed write, turning slug uniqueness violations into
    /// [`PostServiceError::Conflict`].
    pub(crate) fn from_write(err: RepoError, slug: Option<&str>) -> Self {
        match (err, slug) {
            (err, Some(slug)) if err.is_slug_conflict() => Self::Conflict {
                slug: slug.to_string(),
            },
            (err, _) => Self::from(err),
        }
    }
}

impl From<RepoError> for PostServiceError {
    fn from(err: RepoError) -> Self {
        match err {
            RepoError::NotFound => Self::NotFound,
            other => Self::Storage(other),
        }
    }
}

#[derive(Debug, Clone)]
pub struct CreatePostCommand {
    pub title: String,
    pub slug: String,
    pub content: String,
}

#[derive(Debug, Clone)]
pub struct UpdatePostCommand {
    pub id: PostId,
    pub title: Option<String>,
    pub slug: Option<String>,
    pub content: Option<String>,
}

pub fn ensure_non_empty(value: &str, field: &'static str) -> Result<(), PostServiceError> {
    if value.trim().is_empty() {
        return Err(PostServiceError::missing(field));
    }
    Ok(())
}

/// Blank values mean "leave unchanged" on partial updates.
pub fn normalize_optional(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
