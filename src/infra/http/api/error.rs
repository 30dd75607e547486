use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use scriptorium_api_types::{ApiErrorBody, ApiErrorMessage};

use crate::application::error::ErrorReport;

pub mod codes {
    pub const BAD_REQUEST: &str = "bad_request";
    pub const UNAUTHORIZED: &str = "unauthorized";
    pub const NOT_FOUND: &str = "not_found";
    pub const DUPLICATE: &str = "duplicate";
    pub const INVALID_INPUT: &str = "invalid_input";
    pub const INTEGRITY: &str = "integrity_error";
    pub const DB_TIMEOUT: &str = "db_timeout";
    pub const DB_UNAVAILABLE: &str = "db_unavailable";
    pub const REPO: &str = "repo_error";
}

#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    code: &'static str,
    message: &'static str,
    hint: Option<String>,
}

impl ApiError {
    pub fn new(
        status: StatusCode,
        code: &'static str,
        message: &'static str,
        hint: Option<String>,
    ) -> Self {
        Self {
            status,
            code,
            message,
            hint,
        }
    }

    pub fn bad_request(message: &'static str, hint: Option<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, codes::BAD_REQUEST, message, hint)
    }

    pub fn unauthorized(message: &'static str) -> Self {
        Self::new(StatusCode::UNAUTHORIZED, codes::UNAUTHORIZED, message, None)
    }

    pub fn not_found(message: &'static str) -> Self {
        Self::new(StatusCode::NOT_FOUND, codes::NOT_FOUND, message, None)
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn code(&self) -> &'static str {
        self.code
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let detail = format!(
            "{}: {}",
            self.code,
            self.hint.as_deref().unwrap_or(self.message)
        );
        let body = ApiErrorBody {
            error: ApiErrorMessage {
                code: self.code.to_string(),
                message: self.message.to_string(),
                hint: self.hint,
            },
        };
        let mut response = (self.status, Json(body)).into_response();
        ErrorReport::from_message("infra::http::api", self.status, detail).attach(&mut response);
        response
    }
}
