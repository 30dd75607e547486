use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use crate::infra::http::api::error::{ApiError, codes};
use crate::infra::http::api::state::ApiState;

/// `204` when the post store answers, `503` otherwise.
pub async fn database(State(state): State<ApiState>) -> Response {
    match state.posts.health_check().await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(err) => ApiError::new(
            StatusCode::SERVICE_UNAVAILABLE,
            codes::DB_UNAVAILABLE,
            "Database unavailable",
            Some(err.to_string()),
        )
        .into_response(),
    }
}
