//! In-memory comment store.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use tracing::{info, instrument};

use crate::base::types::{Comment, Res};

use super::{CommentStore, GenericCommentStore};

// Extra methods on `CommentStore` applied by the in-memory implementation.

impl CommentStore {
    /// Creates an empty, process-local comment store.
    pub fn memory() -> Self {
        Self::new(Arc::new(MemoryCommentStore::default()))
    }
}

/// Comment store backed by a lock-guarded `Vec`; a comment's id is its index.
#[derive(Default)]
pub struct MemoryCommentStore {
    comments: RwLock<Vec<Comment>>,
}

#[async_trait]
impl GenericCommentStore for MemoryCommentStore {
    #[instrument(name = "MemoryCommentStore::add_comment", skip_all)]
    async fn add_comment(&self, content: String, key_points: Vec<String>) -> Res<Comment> {
        let mut comments = self.comments.write().await;

        let comment = Comment {
            id: comments.len(),
            content,
            key_points,
            is_public: true,
            created_at: Utc::now(),
        };

        comments.push(comment.clone());
        info!("Stored comment {}.", comment.id);

        Ok(comment)
    }

    async fn list_comments(&self, include_private: bool) -> Res<Vec<Comment>> {
        let comments = self.comments.read().await;

        Ok(comments.iter().filter(|comment| include_private || comment.is_public).cloned().collect())
    }

    #[instrument(name = "MemoryCommentStore::set_comment_visibility", skip(self))]
    async fn set_comment_visibility(&self, id: usize, is_public: bool) -> Res<bool> {
        let mut comments = self.comments.write().await;

        match comments.get_mut(id) {
            Some(comment) => {
                comment.is_public = is_public;
                Ok(true)
            }
            None => Ok(false),
        }
    }
}
