//! Ad-hoc extraction endpoint; nothing is stored.

use axum::{Json, extract::State};
use tracing::instrument;

use crate::{base::types::CommentCreate, runtime::Runtime};

use super::error::ApiError;

/// `POST /extract`: returns the key points for the given content.
#[instrument(skip_all)]
pub async fn extract(State(runtime): State<Runtime>, Json(body): Json<CommentCreate>) -> Result<Json<Vec<String>>, ApiError> {
    let key_points = runtime.extractor.extract_key_points(&body.content).await?;

    Ok(Json(key_points))
}
