//! Request and response shapes for the Scriptorium HTTP API.
//!
//! The server and any client tooling share these types so the JSON contract
//! lives in one place. Post payloads are generic: the server decides which
//! view of a post (plain record, card, admin row) goes into an envelope.

use serde::{Deserialize, Serialize};

/// Body of `POST /admin/api/posts`.
///
/// Every field is optional at the wire level so that a missing field is
/// reported as a validation failure (400) instead of a decoding failure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PostCreateRequest {
    pub title: Option<String>,
    pub slug: Option<String>,
    pub content: Option<String>,
}

/// Body of `PATCH /admin/api/posts/{id}`. Absent or blank fields keep their
/// stored value.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PostUpdateRequest {
    pub title: Option<String>,
    pub slug: Option<String>,
    pub content: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostEnvelope<T> {
    pub post: T,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostListEnvelope<T> {
    pub posts: Vec<T>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostMutationEnvelope<T> {
    pub success: bool,
    pub post: T,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteEnvelope {
    pub success: bool,
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiErrorBody {
    pub error: ApiErrorMessage,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiErrorMessage {
    pub code: String,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
}

impl<T> PostMutationEnvelope<T> {
    pub fn ok(post: T) -> Self {
        Self {
            success: true,
            post,
        }
    }
}

impl DeleteEnvelope {
    pub fn deleted() -> Self {
        Self {
            success: true,
            message: "Post deleted successfully".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_request_tolerates_missing_fields() {
        let request: PostCreateRequest =
            serde_json::from_str(r#"{"title":"Hello"}"#).expect("decode");
        assert_eq!(request.title.as_deref(), Some("Hello"));
        assert!(request.slug.is_none());
        assert!(request.content.is_none());
    }

    #[test]
    fn error_body_omits_empty_hint() {
        let body = ApiErrorBody {
            error: ApiErrorMessage {
                code: "not_found".to_string(),
                message: "Post not found".to_string(),
                hint: None,
            },
        };
        let json = serde_json::to_value(&body).expect("encode");
        assert!(json["error"].get("hint").is_none());
    }
}
