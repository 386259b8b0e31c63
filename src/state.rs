use std::sync::Arc;

use crate::config::Config;
use crate::llm::chat::ChatClient;
use crate::llm::embeddings::EmbeddingClient;
use crate::llm::{ChatModel, Embedder};
use crate::pipeline::Pipeline;
use crate::searxng::{SearchProvider, SearxngClient};

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub chat: Arc<dyn ChatModel>,
    pub embedder: Arc<dyn Embedder>,
    pub search: Arc<dyn SearchProvider>,
    pub pipeline_semaphore: Arc<tokio::sync::Semaphore>,
}

impl AppState {
    pub fn new(config: Config) -> anyhow::Result<Self> {
        let http_client = reqwest::Client::builder()
            .connect_timeout(std::time::Duration::from_secs(10))
            .timeout(std::time::Duration::from_secs(120))
            .build()?;

        let chat: Arc<dyn ChatModel> =
            Arc::new(ChatClient::new(http_client.clone(), config.llm.clone()));
        let embedder: Arc<dyn Embedder> =
            Arc::new(EmbeddingClient::new(http_client.clone(), config.llm.clone()));
        let search: Arc<dyn SearchProvider> =
            Arc::new(SearxngClient::new(http_client, config.searxng_url.clone()));

        Ok(Self::with_providers(config, chat, embedder, search))
    }

    /// Build state around injected capability implementations.
    pub fn with_providers(
        config: Config,
        chat: Arc<dyn ChatModel>,
        embedder: Arc<dyn Embedder>,
        search: Arc<dyn SearchProvider>,
    ) -> Self {
        let max_concurrent = config.max_concurrent_pipelines;
        Self {
            config,
            chat,
            embedder,
            search,
            pipeline_semaphore: Arc::new(tokio::sync::Semaphore::new(max_concurrent)),
        }
    }

    pub fn pipeline(&self) -> Pipeline {
        Pipeline::new(
            self.chat.clone(),
            self.embedder.clone(),
            self.search.clone(),
        )
    }
}
