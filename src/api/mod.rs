//! HTTP surface for comment-digest.
//!
//! This module wires the axum router:
//! - `GET /healthz`
//! - `POST /extract`
//! - `POST /api/comments`, `GET /api/comments`
//! - `PATCH /api/comments/{comment_id}/visibility`
//!
//! Every handler receives the [`Runtime`] as router state.

pub mod comments;
pub mod error;
pub mod extract;

use axum::{
    Json, Router,
    routing::{get, patch, post},
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::{base::types::StatusResponse, runtime::Runtime};

/// Build the application router over the given runtime.
///
/// CORS is wide open (any origin, method and header).
pub fn router(runtime: Runtime) -> Router {
    Router::new()
        .route("/healthz", get(healthz))
        .route("/extract", post(extract::extract))
        .route("/api/comments", post(comments::create_comment).get(comments::list_comments))
        .route("/api/comments/{comment_id}/visibility", patch(comments::update_comment_visibility))
        .layer(CorsLayer::very_permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(runtime)
}

async fn healthz() -> Json<StatusResponse> {
    Json(StatusResponse::ok())
}
