//! HTTP surface: routing, middleware and JSON handlers.

pub mod api;
pub mod middleware;

pub use api::{ApiState, build_router};
