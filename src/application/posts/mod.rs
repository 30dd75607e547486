mod commands;
mod queries;
mod service;
pub mod types;

pub use service::*;
pub use types::{
    CreatePostCommand, POST_SLUG_CONFLICTS_METRIC, POSTS_CREATED_METRIC, POSTS_DELETED_METRIC,
    POSTS_UPDATED_METRIC, PostServiceError, UpdatePostCommand, ensure_non_empty,
    normalize_optional,
};
