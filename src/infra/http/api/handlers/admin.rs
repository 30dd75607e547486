//! Admin post handlers. Routed behind `admin_auth`.

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Extension, Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use scriptorium_api_types::{
    DeleteEnvelope, PostCreateRequest, PostEnvelope, PostListEnvelope, PostMutationEnvelope,
    PostUpdateRequest,
};

use crate::application::admin_gate::AdminPrincipal;
use crate::application::posts::{CreatePostCommand, UpdatePostCommand};
use crate::domain::types::PostId;
use crate::presentation::views::AdminPostRow;

use super::{json_to_api, post_to_api};
use crate::infra::http::api::error::ApiError;
use crate::infra::http::api::state::ApiState;

pub async fn list_posts(State(state): State<ApiState>) -> Result<impl IntoResponse, ApiError> {
    let posts = state.posts.list_posts().await.map_err(post_to_api)?;
    let rows: Vec<AdminPostRow> = posts.into_iter().map(AdminPostRow::from).collect();

    Ok(Json(PostListEnvelope { posts: rows }))
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

    Ok(Json(PostEnvelope { post }))
}

pub async fn create_post(
    State(state): State<ApiState>,
    Extension(principal): Extension<AdminPrincipal>,
    payload: Result<Json<PostCreateRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(payload) = payload.map_err(json_to_api)?;

    let command = CreatePostCommand {
        title: payload.title.unwrap_or_default(),
        slug: payload.slug.unwrap_or_default(),
        content: payload.content.unwrap_or_default(),
    };

    let post = state
        .posts
        .create_post(&principal.label, command)
        .await
        .map_err(post_to_api)?;

    Ok((StatusCode::CREATED, Json(PostMutationEnvelope::ok(post))))
}

pub async fn update_post(
    State(state): State<ApiState>,
    Extension(principal): Extension<AdminPrincipal>,
    Path(id): Path<String>,
    payload: Result<Json<PostUpdateRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(payload) = payload.map_err(json_to_api)?;

    let command = UpdatePostCommand {
        id: PostId::from(id),
        title: payload.title,
        slug: payload.slug,
        content: payload.content,
    };

    let post = state
        .posts
        .update_post(&principal.label, command)
        .await
        .map_err(post_to_api)?;

    Ok(Json(PostMutationEnvelope::ok(post)))
}

pub async fn delete_post(
    State(state): State<ApiState>,
    Extension(principal): Extension<AdminPrincipal>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    state
        .posts
        .delete_post(&principal.label, &PostId::from(id))
        .await
        .map_err(post_to_api)?;

    Ok(Json(DeleteEnvelope::deleted()))
}
