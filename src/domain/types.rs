//! Identifier types shared across the layers.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Opaque, unique, immutable identifier of a post.
///
/// Identifiers are plain strings on the wire and in storage; the server mints
/// them from random UUIDs but accepts any string when looking posts up, so an
/// unknown id is a 404 rather than a decoding error.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, sqlx::Type)]
#[serde(transparent)]
#[sqlx(transparent)]
pub struct PostId(String);

impl PostId {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for PostId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for PostId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for PostId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}
