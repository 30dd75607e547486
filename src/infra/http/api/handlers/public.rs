use axum::Json;
use axum::extract::{Path, State};
use axum::response::IntoResponse;
use scriptorium_api_types::{PostEnvelope, PostListEnvelope};

use crate::domain::types::PostId;
use crate::presentation::views::PostCard;

use super::post_to_api;
use crate::infra::http::api::error::ApiError;
use crate::infra::http::api::state::ApiState;

pub async fn list_posts(State(state): State<ApiState>) -> Result<impl IntoResponse, ApiError> {
    let posts = state.posts.list_posts().await.map_err(post_to_api)?;
    let cards: Vec<PostCard> = posts.into_iter().map(PostCard::from).collect();

    Ok(Json(PostListEnvelope { posts: cards }))
}

pub async fn get_post(
    State(state): State<ApiState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let post = state
        .posts
        .get_post(&PostId::from(id))
        .await
        .map_err(post_to_api)?;

    Ok(Json(PostEnvelope {
        post: PostCard::from(post),
    }))
}

pub async fn get_post_by_slug(
    State(state): State<ApiState>,
    Path(slug): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let post = state
        .posts
        .get_post_by_slug(&slug)
        .await
        .map_err(post_to_api)?;

    Ok(Json(PostEnvelope {
        post: PostCard::from(post),
    }))
}
