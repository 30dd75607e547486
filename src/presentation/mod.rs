//! Derived, read-only views over stored posts.

pub mod markup;
pub mod views;
