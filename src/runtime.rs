//! Runtime services and shared state for comment-digest.

use tokio::net::TcpListener;
use tracing::{info, instrument};

use crate::{
    api,
    base::{
        config::Config,
        prompts::load_prompt,
        types::{Res, Void},
    },
    service::{extractor::KeyPointExtractor, llm::LlmClient, store::CommentStore},
};

/// Runtime service context that can be shared across the application.
///
/// This struct holds the configuration, the comment store, and the extractor.
/// It is designed to be trivially cloneable, allowing it to be passed around
/// (e.g., as router state) without the need for `Arc` or `Mutex`.
#[derive(Clone)]
pub struct Runtime {
    /// The configuration for the application.
    pub config: Config,
    /// The comment store instance.
    pub store: CommentStore,
    /// The key-point extractor instance.
    pub extractor: KeyPointExtractor,
}

impl Runtime {
    /// Create a new runtime instance.
    ///
    /// The extraction prompt is loaded here, once per process.
    #[instrument(skip_all)]
    pub async fn new(config: Config) -> Res<Self> {
        // Load the extraction prompt.
        let prompt = load_prompt(&config.prompt_path);

        // Initialize the LLM client.
        let llm = LlmClient::openai(&config);

        // Initialize the extractor.
        let extractor = KeyPointExtractor::new(llm, prompt, config.retry_policy());

        // Initialize the store.
        let store = CommentStore::memory();

        Ok(Self { config, store, extractor })
    }

    /// Serve the HTTP API until Ctrl-C.
    pub async fn start(&self) -> Void {
        let listener = TcpListener::bind(&self.config.bind_address).await?;
        info!("Listening on http://{} ...", listener.local_addr()?);

        axum::serve(listener, api::router(self.clone()))
            .with_graceful_shutdown(async {
                let _ = tokio::signal::ctrl_c().await;
                info!("Shutting down ...");
            })
            .await?;

        Ok(())
    }
}
