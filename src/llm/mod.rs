use std::pin::Pin;

use anyhow::Result;
use async_trait::async_trait;
use futures_util::stream::Stream;

use crate::models::ChatMessage;

pub mod chat;
pub mod embeddings;

/// Stream of answer content deltas from the model.
pub type TokenStream = Pin<Box<dyn Stream<Item = Result<String>> + Send>>;

/// Chat-completion capability. Backs query rewriting, suggestion
/// generation, and answer synthesis; injected so transports and tests
/// can swap providers.
#[async_trait]
pub trait ChatModel: Send + Sync {
    /// Run the messages to completion and return the full response text.
    async fn complete(&self, messages: Vec<ChatMessage>) -> Result<String>;

    /// Stream the response as content deltas (one per token/chunk).
    async fn stream(&self, messages: Vec<ChatMessage>) -> Result<TokenStream>;
}

/// Text-embedding capability used by the reranker.
#[async_trait]
pub trait Embedder: Send + Sync {
    /// Embed a batch of texts in a single request.
    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>>;

    /// Embed one text.
    async fn embed_single(&self, text: &str) -> Result<Vec<f32>>;
}
