use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub type Err = anyhow::Error;
pub type Res<T> = Result<T, Err>;
pub type Void = Res<()>;

/// A public comment along with the key points extracted from it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    /// Sequential identifier, assigned by the store on insert.
    pub id: usize,
    pub content: String,
    /// Key points as returned by the extractor at creation time.
    pub key_points: Vec<String>,
    pub is_public: bool,
    pub created_at: DateTime<Utc>,
}

/// Request body for comment submission and ad-hoc extraction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommentCreate {
    pub content: String,
}

/// Public view of a [`Comment`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommentResponse {
    pub id: usize,
    pub content: String,
    pub key_points: Vec<String>,
    pub is_public: bool,
    pub created_at: DateTime<Utc>,
}

impl From<Comment> for CommentResponse {
    fn from(comment: Comment) -> Self {
        Self {
            id: comment.id,
            content: comment.content,
            key_points: comment.key_points,
            is_public: comment.is_public,
            created_at: comment.created_at,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct StatusResponse {
    pub status: String,
}

impl StatusResponse {
    pub fn ok() -> Self {
        Self { status: "ok".to_string() }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub detail: String,
}
