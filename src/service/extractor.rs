//! Key-point extraction over an LLM client.
//!
//! The extractor owns the loaded system prompt and the retry policy; each call
//! is a strictly sequential run of attempts against the underlying client.

use std::sync::Arc;

use serde_json::Value;
use thiserror::Error;
use tracing::{debug, error, info, instrument, warn};

use crate::{
    base::{retry::RetryPolicy, types::Res},
    service::llm::LlmClient,
};

/// Terminal extraction failure, after every attempt has been spent.
///
/// The display text is the user-facing (localized) message. The underlying
/// cause is logged, not carried.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ExtractionError {
    #[error("要点の抽出がタイムアウトしました")]
    Timeout,
    #[error("要点の抽出に失敗しました")]
    Failed,
}

/// Extracts key points from comment text.
///
/// Trivially cloneable; the prompt is shared and never mutated after construction.
#[derive(Clone)]
pub struct KeyPointExtractor {
    llm: LlmClient,
    system_prompt: Arc<str>,
    policy: RetryPolicy,
}

impl KeyPointExtractor {
    pub fn new(llm: LlmClient, system_prompt: impl Into<Arc<str>>, policy: RetryPolicy) -> Self {
        Self {
            llm,
            system_prompt: system_prompt.into(),
            policy,
        }
    }

    /// Distill `content` into an ordered list of key points.
    ///
    /// The content is sent as-is. A reply that is valid JSON but not an array
    /// yields an empty list.
    #[instrument(name = "KeyPointExtractor::extract_key_points", skip_all, fields(content_len = content.len()))]
    pub async fn extract_key_points(&self, content: &str) -> Result<Vec<String>, ExtractionError> {
        let llm = &self.llm;
        let system_prompt = &*self.system_prompt;

        let result = self
            .policy
            .run(|attempt| async move {
                debug!("Extraction attempt {attempt} ...");

                let body = llm.complete_json(system_prompt, content).await?;
                parse_key_points(&body)
            })
            .await;

        match result {
            Ok(key_points) => {
                info!("Extracted {} key points.", key_points.len());
                Ok(key_points)
            }
            Err(err) => {
                error!("Error in OpenAI extraction: {err}");

                if err.is_timeout() { Err(ExtractionError::Timeout) } else { Err(ExtractionError::Failed) }
            }
        }
    }
}

/// Parse an LLM reply body into key points.
///
/// - A JSON array of strings is returned in order.
/// - Any other JSON value is treated as "no key points" (with a warning).
/// - Invalid JSON, or an array holding non-strings, is an error.
pub fn parse_key_points(body: &str) -> Res<Vec<String>> {
    let value: Value = serde_json::from_str(body)?;

    match value {
        Value::Array(items) => items
            .into_iter()
            .map(|item| match item {
                Value::String(point) => Ok(point),
                other => Err(anyhow::anyhow!("Key point is not a string: {other}")),
            })
            .collect(),
        other => {
            warn!("LLM reply is not a JSON array, treating as empty: {other}");
            Ok(Vec::new())
        }
    }
}
