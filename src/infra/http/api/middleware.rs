use axum::body::Body;
use axum::extract::State;
use axum::http::{HeaderValue, Request, header::AUTHORIZATION};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};

use crate::application::admin_gate::AdminAuthError;

use super::error::ApiError;
use super::state::ApiState;

pub const ADMIN_TOKEN_HEADER: &str = "x-admin-token";

/// Admit admin requests carrying the configured token and attach the
/// resulting `AdminPrincipal`.
pub async fn admin_auth(
    State(state): State<ApiState>,
    mut request: Request<Body>,
    next: Next,
) -> Response {
    let token = extract_bearer(request.headers().get(AUTHORIZATION)).or_else(|| {
        request
            .headers()
            .get(ADMIN_TOKEN_HEADER)
            .and_then(|v| v.to_str().ok().map(|s| s.to_string()))
    });

    let principal = match state.admin_gate.authenticate(token.as_deref()) {
        Ok(principal) => principal,
        Err(AdminAuthError::Missing) => {
            return ApiError::unauthorized("Admin token required").into_response();
        }
        Err(AdminAuthError::Invalid) => {
            return ApiError::unauthorized("Admin token invalid").into_response();
        }
    };

    request.extensions_mut().insert(principal);
    next.run(request).await
}

fn extract_bearer(header: Option<&HeaderValue>) -> Option<String> {
    let raw = header?.to_str().ok()?;
    let bearer = raw.strip_prefix("Bearer ")?;
    Some(bearer.to_string())
}
