use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Server bind address
    pub bind_addr: String,
    /// Base URL of the SearXNG metasearch instance
    pub searxng_url: String,
    /// LLM provider configuration
    pub llm: LlmConfig,
    /// Maximum pipeline turns running at once across all clients
    pub max_concurrent_pipelines: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    /// "ollama" or "openai"
    pub provider: String,
    /// Base URL for the LLM API
    pub base_url: String,
    /// Model name for chat (rewriting, synthesis, suggestions)
    pub chat_model: String,
    /// Model name for embeddings
    pub embedding_model: String,
    /// API key (only needed for cloud providers)
    pub api_key: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind_addr: "127.0.0.1:8000".to_string(),
            searxng_url: "http://localhost:8080".to_string(),
            llm: LlmConfig::default(),
            max_concurrent_pipelines: 8,
        }
    }
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            provider: "ollama".to_string(),
            base_url: "http://localhost:11434".to_string(),
            chat_model: "llama3.2".to_string(),
            embedding_model: "nomic-embed-text".to_string(),
            api_key: None,
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(addr) = std::env::var("AISEARCH_BIND_ADDR") {
            config.bind_addr = addr;
        }
        if let Ok(url) = std::env::var("SEARXNG_API_URL") {
            config.searxng_url = url;
        }
        if let Ok(provider) = std::env::var("LLM_PROVIDER") {
            config.llm.provider = provider;
        }
        if let Ok(url) = std::env::var("LLM_BASE_URL") {
            config.llm.base_url = url;
        }
        if let Ok(model) = std::env::var("LLM_CHAT_MODEL") {
            config.llm.chat_model = model;
        }
        if let Ok(model) = std::env::var("LLM_EMBEDDING_MODEL") {
            config.llm.embedding_model = model;
        }
        if let Ok(key) = std::env::var("LLM_API_KEY") {
            config.llm.api_key = Some(key);
        }
        if let Ok(val) = std::env::var("AISEARCH_MAX_CONCURRENT_PIPELINES") {
            if let Ok(v) = val.parse::<usize>() {
                config.max_concurrent_pipelines = v.max(1);
            }
        }

        config
    }
}
