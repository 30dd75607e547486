pub mod error;
pub mod handlers;
pub mod middleware;
pub mod state;

pub use state::ApiState;

use axum::{Router, middleware as axum_middleware, routing::get};

use crate::infra::http::middleware::{log_responses, set_request_context};

/// Public read API, admin API and health probe on one router.
pub fn build_router(state: ApiState) -> Router {
    let admin = Router::new()
        .route(
            "/admin/api/posts",
            get(handlers::admin::list_posts).post(handlers::admin::create_post),
        )
        .route(
            "/admin/api/posts/{id}",
            get(handlers::admin::get_post)
                .patch(handlers::admin::update_post)
                .delete(handlers::admin::delete_post),
        )
        .route_layer(axum_middleware::from_fn_with_state(
            state.clone(),
            middleware::admin_auth,
        ));

    Router::new()
        .route("/api/posts", get(handlers::public::list_posts))
        .route("/api/posts/{id}", get(handlers::public::get_post))
        .route(
            "/api/posts/slug/{slug}",
            get(handlers::public::get_post_by_slug),
        )
        .route("/_health/db", get(handlers::health::database))
        .merge(admin)
        .with_state(state)
        .layer(axum_middleware::from_fn(log_responses))
        .layer(axum_middleware::from_fn(set_request_context))
}
