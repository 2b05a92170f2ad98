//! Comment storage.
//!
//! The store owns every [`Comment`] exclusively. Comments are appended with a
//! sequential id, may have their visibility toggled, and are never removed.

pub mod memory;

use std::{ops::Deref, sync::Arc};

use async_trait::async_trait;

use crate::base::types::{Comment, Res};

// Traits.

/// Generic comment store trait that stores must implement.
///
/// Implementations must serialize mutations so that ids stay sequential under
/// concurrent submissions.
#[async_trait]
pub trait GenericCommentStore: Send + Sync + 'static {
    /// Appends a new public comment and returns it with its assigned id.
    async fn add_comment(&self, content: String, key_points: Vec<String>) -> Res<Comment>;

    /// Lists comments in creation order.
    ///
    /// Private comments are only included when `include_private` is set.
    async fn list_comments(&self, include_private: bool) -> Res<Vec<Comment>>;

    /// Sets the visibility flag of a comment.
    ///
    /// Returns `false` (and changes nothing) if no comment has the given id.
    async fn set_comment_visibility(&self, id: usize, is_public: bool) -> Res<bool>;
}

// Structs.

/// Comment store for the application.
///
/// This is trivially cloneable and can be passed around without the need for `Arc` or `Mutex`.
#[derive(Clone)]
pub struct CommentStore {
    inner: Arc<dyn GenericCommentStore>,
}

impl Deref for CommentStore {
    type Target = dyn GenericCommentStore;

    fn deref(&self) -> &Self::Target {
        &*self.inner
    }
}

impl CommentStore {
    pub fn new(inner: Arc<dyn GenericCommentStore>) -> Self {
        Self { inner }
    }
}
