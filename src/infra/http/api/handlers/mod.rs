//! JSON handlers and the error mappings they share.

pub mod admin;
pub mod health;
pub mod public;

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;

use crate::application::posts::PostServiceError;
use crate::application::repos::RepoError;

use super::error::{ApiError, codes};

pub(crate) fn repo_to_api(err: RepoError) -> ApiError {
    match err {
        RepoError::Duplicate { constraint } => ApiError::new(
            StatusCode::CONFLICT,
            codes::DUPLICATE,
            "Duplicate record",
            Some(constraint),
        ),
        RepoError::NotFound => ApiError::not_found("Resource not found"),
        RepoError::InvalidInput { message } => ApiError::new(
            StatusCode::BAD_REQUEST,
            codes::INVALID_INPUT,
            "Invalid input",
            Some(message),
        ),
        RepoError::Integrity { message } => ApiError::new(
            StatusCode::CONFLICT,
            codes::INTEGRITY,
            "Integrity constraint violated",
            Some(message),
        ),
        RepoError::Timeout => ApiError::new(
            StatusCode::SERVICE_UNAVAILABLE,
            codes::DB_TIMEOUT,
            "Database timeout",
            None,
        ),
        RepoError::Persistence(msg) => ApiError::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            codes::REPO,
            "Persistence error",
            Some(msg),
        ),
    }
}

pub(crate) fn post_to_api(err: PostServiceError) -> ApiError {
    match err {
        PostServiceError::Validation { field, reason } => ApiError::new(
            StatusCode::BAD_REQUEST,
            codes::INVALID_INPUT,
            "Invalid post",
            Some(format!("{field}: {reason}")),
        ),
        PostServiceError::Conflict { slug } => ApiError::new(
            StatusCode::CONFLICT,
            codes::DUPLICATE,
            "Slug already exists",
            Some(slug),
        ),
        PostServiceError::NotFound => ApiError::not_found("Post not found"),
        PostServiceError::Storage(repo) => repo_to_api(repo),
    }
}

pub(crate) fn json_to_api(rejection: JsonRejection) -> ApiError {
    ApiError::bad_request("Invalid request body", Some(rejection.body_text()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn service_errors_map_to_statuses() {
        let cases = [
            (
                PostServiceError::Validation {
                    field: "title",
                    reason: "must not be empty".to_string(),
                },
                StatusCode::BAD_REQUEST,
                codes::INVALID_INPUT,
            ),
            (
                PostServiceError::Conflict {
                    slug: "taken".to_string(),
                },
                StatusCode::CONFLICT,
                codes::DUPLICATE,
            ),
            (
                PostServiceError::NotFound,
                StatusCode::NOT_FOUND,
                codes::NOT_FOUND,
            ),
            (
                PostServiceError::Storage(RepoError::Timeout),
                StatusCode::SERVICE_UNAVAILABLE,
                codes::DB_TIMEOUT,
            ),
            (
                PostServiceError::Storage(RepoError::from_persistence("boom")),
                StatusCode::INTERNAL_SERVER_ERROR,
                codes::REPO,
            ),
        ];

        for (err, status, code) in cases {
            let api = post_to_api(err);
            assert_eq!(api.status(), status);
            assert_eq!(api.code(), code);
        }
    }
}
