//! Mapping of application failures onto HTTP responses.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;
use tracing::{error, warn};

use crate::{base::types::ErrorResponse, service::extractor::ExtractionError};

/// Errors surfaced by the HTTP handlers.
///
/// The display text becomes the `detail` field of the response body; nothing
/// else about the failure reaches the client.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("コメント内容は必須です")]
    EmptyContent,
    #[error("コメントが見つかりません")]
    CommentNotFound,
    #[error(transparent)]
    Extraction(#[from] ExtractionError),
    #[error("内部エラーが発生しました")]
    Internal(anyhow::Error),
}

impl From<anyhow::Error> for ApiError {
    fn from(err: anyhow::Error) -> Self {
        ApiError::Internal(err)
    }
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::EmptyContent => StatusCode::BAD_REQUEST,
            ApiError::CommentNotFound => StatusCode::NOT_FOUND,
            ApiError::Extraction(_) | ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();

        match &self {
            ApiError::Internal(err) => error!("Internal error while handling request: {err:#}"),
            ApiError::Extraction(err) => error!("Extraction failed while handling request: {err}"),
            _ => warn!("Rejecting request ({status}): {self}"),
        }

        (status, Json(ErrorResponse { detail: self.to_string() })).into_response()
    }
}
