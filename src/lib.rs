//! Library root for `comment-digest`.
//!
//! Comment-digest is an LLM-powered intake service for public comments designed to:
//! - Accept free-text comments over HTTP
//! - Distill each comment into a short ordered list of key points
//! - Keep comments in memory, with a visibility flag controlling public listing
//!
//! The service integrates with OpenAI for extraction and serves its API with axum.
//! The architecture is built around traits that allow for different implementations
//! of the LLM client and the comment store.

pub mod base;
pub mod api;
pub mod runtime;
pub mod service;

use base::{config::Config, types::Void};
use tracing::info;

/// Public async entry for the binary crate.
///
/// Sets up necessary services and starts the comment-digest runtime:
/// - Loads the extraction prompt and creates the LLM client and extractor
/// - Creates the in-memory comment store
/// - Serves the HTTP API until shutdown
pub async fn start(config: Config) -> Void {
    info!("Starting comment-digest ...");

    // Initialize the runtime.
    let runtime = runtime::Runtime::new(config).await?;

    // Start the runtime.
    runtime.start().await?;

    Ok(())
}
