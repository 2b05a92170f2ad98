//! Comment submission, listing, and visibility endpoints.

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;
use tracing::{info, instrument};

use crate::{
    base::types::{CommentCreate, CommentResponse, StatusResponse},
    runtime::Runtime,
};

use super::error::ApiError;

#[derive(Debug, Deserialize)]
pub struct ListCommentsQuery {
    #[serde(default)]
    pub show_private: bool,
}

#[derive(Debug, Deserialize)]
pub struct VisibilityQuery {
    pub is_public: bool,
}

/// `POST /api/comments`: extract key points, then store the comment as public.
///
/// Empty content is rejected before the extractor is called. Nothing is stored
/// if extraction fails.
#[instrument(skip_all)]
pub async fn create_comment(State(runtime): State<Runtime>, Json(body): Json<CommentCreate>) -> Result<Json<CommentResponse>, ApiError> {
    if body.content.is_empty() {
        return Err(ApiError::EmptyContent);
    }

    let key_points = runtime.extractor.extract_key_points(&body.content).await?;
    let comment = runtime.store.add_comment(body.content, key_points).await?;

    info!("Created comment {} with {} key points.", comment.id, comment.key_points.len());

    Ok(Json(comment.into()))
}

/// `GET /api/comments?show_private=bool`
#[instrument(skip(runtime))]
pub async fn list_comments(State(runtime): State<Runtime>, Query(query): Query<ListCommentsQuery>) -> Result<Json<Vec<CommentResponse>>, ApiError> {
    let comments = runtime.store.list_comments(query.show_private).await?;

    Ok(Json(comments.into_iter().map(CommentResponse::from).collect()))
}

/// `PATCH /api/comments/{comment_id}/visibility?is_public=bool`
///
/// Any id outside the store, negative ones included, is a 404.
#[instrument(skip(runtime))]
pub async fn update_comment_visibility(
    State(runtime): State<Runtime>,
    Path(comment_id): Path<i64>,
    Query(query): Query<VisibilityQuery>,
) -> Result<Json<StatusResponse>, ApiError> {
    let id = usize::try_from(comment_id).map_err(|_| ApiError::CommentNotFound)?;

    if !runtime.store.set_comment_visibility(id, query.is_public).await? {
        return Err(ApiError::CommentNotFound);
    }

    info!("Comment {comment_id} is now {}.", if query.is_public { "public" } else { "private" });

    Ok(Json(StatusResponse::ok()))
}
