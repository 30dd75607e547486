//! Application services layer.

pub mod admin_gate;
pub mod clock;
pub mod error;
pub mod posts;
pub mod repos;
