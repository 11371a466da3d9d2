//! Embedding configuration: trait and env-based implementation.

use anyhow::Result;
use std::env;

pub const DEFAULT_EMBEDDING_MODEL: &str = "text-embedding-3-small";

/// Embedding service configuration interface.
pub trait EmbeddingConfig: Send + Sync {
    fn model(&self) -> &str;
    /// API key for the OpenAI-compatible embedding endpoint. May be empty for keyless local servers.
    fn api_key(&self) -> &str;
    /// Optional base URL (e.g. a local server hosting a sentence-transformers model).
    fn base_url(&self) -> Option<&str>;
}

/// Embedding config loaded from environment variables.
#[derive(Debug, Clone, PartialEq)]
pub struct EnvEmbeddingConfig {
    pub embedding_model: String,
    pub embedding_api_key: String,
    pub embedding_base_url: Option<String>,
}

impl EmbeddingConfig for EnvEmbeddingConfig {
    fn model(&self) -> &str {
        &self.embedding_model
    }
    fn api_key(&self) -> &str {
        &self.embedding_api_key
    }
    fn base_url(&self) -> Option<&str> {
        self.embedding_base_url.as_deref().filter(|s| !s.is_empty())
    }
}

impl EnvEmbeddingConfig {
    /// Load from environment variables.
    ///
    /// `EMBEDDING_MODEL`, `EMBEDDING_API_KEY` (falls back to `OPENAI_API_KEY`), `EMBEDDING_BASE_URL`.
    pub fn from_env() -> Result<Self> {
        let embedding_model = env::var("EMBEDDING_MODEL")
            .ok()
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_EMBEDDING_MODEL.to_string());
        let embedding_api_key = env::var("EMBEDDING_API_KEY")
            .ok()
            .filter(|s| !s.trim().is_empty())
            .or_else(|| env::var("OPENAI_API_KEY").ok())
            .unwrap_or_default();
        let embedding_base_url = env::var("EMBEDDING_BASE_URL")
            .ok()
            .filter(|s| !s.trim().is_empty());
        Ok(Self {
            embedding_model,
            embedding_api_key,
            embedding_base_url,
        })
    }

    /// Validate config: the hosted endpoint needs a key, a custom base URL may run keyless.
    pub fn validate(&self) -> Result<()> {
        if self.base_url().is_none() && self.embedding_api_key.trim().is_empty() {
            anyhow::bail!(
                "EMBEDDING_API_KEY or OPENAI_API_KEY must be set unless EMBEDDING_BASE_URL points at a keyless server"
            );
        }
        Ok(())
    }
}
