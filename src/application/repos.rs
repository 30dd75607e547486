//! Repository traits describing persistence adapters.

use async_trait::async_trait;
use thiserror::Error;
use time::OffsetDateTime;

use crate::domain::entities::PostRecord;
use crate::domain::types::PostId;

/// Unique constraint guarding post slugs.
pub const POSTS_SLUG_CONSTRAINT: &str = "posts_slug_key";
/// Unique constraint guarding post identifiers.
pub const POSTS_ID_CONSTRAINT: &str = "posts_pkey";

#[derive(Debug, Error)]
pub enum RepoError {
    #[error("persistence error: {0}")]
    Persistence(String),
    #[error("duplicate record violates unique constraint `{constraint}`")]
    Duplicate { constraint: String },
    #[error("resource not found")]
    NotFound,
    #[error("invalid input: {message}")]
    InvalidInput { message: String },
    #[error("integrity error: {message}")]
    Integrity { message: String },
    #[error("database timeout")]
    Timeout,
}

impl RepoError {
    pub fn from_persistence(err: impl std::fmt::Display) -> Self {
        Self::Persistence(err.to_string())
    }

    pub fn duplicate(constraint: &str) -> Self {
        Self::Duplicate {
            constraint: constraint.to_string(),
        }
    }

    pub fn is_slug_conflict(&self) -> bool {
        matches!(self, Self::Duplicate { constraint } if constraint == POSTS_SLUG_CONSTRAINT)
    }
}

#[derive(Debug, Clone)]
pub struct NewPostRecord {
    pub id: PostId,
    pub title: String,
    pub content: String,
    pub slug: String,
    /// Used for both `created_at` and `updated_at`.
    pub created_at: OffsetDateTime,
}

/// Partial update; `None` keeps the stored value.
///
/// Stores persist `max(created_at, updated_at)` so a lagging clock never
/// breaks timestamp ordering.
#[derive(Debug, Clone)]
pub struct UpdatePostParams {
    pub id: PostId,
    pub title: Option<String>,
    pub slug: Option<String>,
    pub content: Option<String>,
    pub updated_at: OffsetDateTime,
}

#[async_trait]
pub trait PostsRepo: Send + Sync {
    /// All posts, newest `created_at` first; ties resolve to the most
    /// recently inserted post first.
    async fn list_posts(&self) -> Result<Vec<PostRecord>, RepoError>;

    async fn find_by_id(&self, id: &PostId) -> Result<Option<PostRecord>, RepoError>;

    async fn find_by_slug(&self, slug: &str) -> Result<Option<PostRecord>, RepoError>;

    async fn health_check(&self) -> Result<(), RepoError>;
}

#[async_trait]
pub trait PostsWriteRepo: Send + Sync {
    /// Fails with [`RepoError::Duplicate`] naming [`POSTS_SLUG_CONSTRAINT`]
    /// when the slug is taken, checked atomically with the write.
    async fn insert_post(&self, params: NewPostRecord) -> Result<PostRecord, RepoError>;

    /// Fails with [`RepoError::NotFound`] for unknown ids and with
    /// [`RepoError::Duplicate`] when the new slug belongs to another post.
    async fn update_post(&self, params: UpdatePostParams) -> Result<PostRecord, RepoError>;

    async fn delete_post(&self, id: &PostId) -> Result<(), RepoError>;
}
