//! # OpenAI-compatible Embedding Service
//!
//! Implements [`EmbeddingService`] over any endpoint that speaks the OpenAI `/embeddings` API:
//! the hosted OpenAI API, or a local server (text-embeddings-inference, Ollama, ...) hosting a
//! sentence-transformers model such as `all-MiniLM-L6-v2`.
//!
//! ## Example
//!
//! ```rust,no_run
//! use openai_embedding::OpenAIEmbedding;
//! use embedding::EmbeddingService;
//!
//! async fn example() -> Result<(), anyhow::Error> {
//!     let service = OpenAIEmbedding::new("sk-...".to_string(), "text-embedding-3-small".to_string());
//!     let vector = service.embed("Winter is coming.").await?;
//!     println!("dimension: {}", vector.len());
//!     Ok(())
//! }
//! ```

use std::time::Duration;

use async_openai::{
    config::OpenAIConfig,
    types::{CreateEmbeddingRequestArgs, EmbeddingInput},
    Client,
};
use async_trait::async_trait;
use embedding::{EmbeddingConfig, EmbeddingService, DEFAULT_EMBEDDING_MODEL};
use tracing::{debug, info, instrument, warn};

/// Timeout for a single embed request (connect + request + response).
const EMBED_TIMEOUT: Duration = Duration::from_secs(30);
/// Batch requests carry larger payloads.
const EMBED_BATCH_TIMEOUT: Duration = Duration::from_secs(60);

/// OpenAI-compatible embedding service. Holds the async-openai client and model name.
#[derive(Debug, Clone)]
pub struct OpenAIEmbedding {
    client: Client<OpenAIConfig>,
    model: String,
}

impl OpenAIEmbedding {
    /// Creates a service against the default OpenAI API base.
    ///
    /// If `api_key` is empty the `OPENAI_API_KEY` environment variable is used.
    pub fn new(api_key: String, model: String) -> Self {
        Self::new_with_base_url(api_key, model, None)
    }

    /// Creates a service with an optional base URL for OpenAI-compatible endpoints.
    pub fn new_with_base_url(api_key: String, model: String, base_url: Option<&str>) -> Self {
        let api_key = if api_key.is_empty() {
            std::env::var("OPENAI_API_KEY").unwrap_or_default()
        } else {
            api_key
        };

        let mut openai_config = OpenAIConfig::new().with_api_key(api_key);
        if let Some(url) = base_url.filter(|s| !s.is_empty()) {
            openai_config = openai_config.with_api_base(url);
        }

        Self {
            client: Client::with_config(openai_config),
            model,
        }
    }

    /// Builds the service from an [`EmbeddingConfig`] (env or test config).
    pub fn from_config(config: &dyn EmbeddingConfig) -> Self {
        let model = if config.model().is_empty() {
            DEFAULT_EMBEDDING_MODEL.to_string()
        } else {
            config.model().to_string()
        };
        Self::new_with_base_url(config.api_key().to_string(), model, config.base_url())
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    async fn request(
        &self,
        input: EmbeddingInput,
        timeout: Duration,
    ) -> Result<Vec<Vec<f32>>, anyhow::Error> {
        let request = CreateEmbeddingRequestArgs::default()
            .model(self.model.clone())
            .input(input)
            .build()?;

        let embeddings = self.client.embeddings();
        let response = match tokio::time::timeout(timeout, embeddings.create(request)).await {
            Ok(Ok(r)) => {
                debug!("embedding response received");
                r
            }
            Ok(Err(e)) => {
                warn!(error = %e, "embedding request failed");
                return Err(e.into());
            }
            Err(_) => {
                warn!(timeout_secs = timeout.as_secs(), "embedding request timed out");
                return Err(anyhow::anyhow!(
                    "embedding request timed out after {} seconds",
                    timeout.as_secs()
                ));
            }
        };

        // Some compatible servers do not guarantee order; the index field is authoritative.
        let mut data = response.data;
        data.sort_by_key(|item| item.index);
        Ok(data.into_iter().map(|item| item.embedding).collect())
    }
}

#[async_trait]
impl EmbeddingService for OpenAIEmbedding {
    #[instrument(skip(self, text), fields(model = %self.model, text_len = text.len()))]
    async fn embed(&self, text: &str) -> Result<Vec<f32>, anyhow::Error> {
        info!(text_len = text.len(), "step: embedding embed request");

        let vectors = self
            .request(EmbeddingInput::String(text.to_string()), EMBED_TIMEOUT)
            .await?;
        let embedding = match vectors.into_iter().next() {
            Some(v) => v,
            None => {
                warn!("embedding response has no data");
                return Err(anyhow::anyhow!("No embedding in response"));
            }
        };

        info!(dimension = embedding.len(), "step: embedding embed done");
        Ok(embedding)
    }

    #[instrument(skip(self, texts), fields(model = %self.model, batch_size = texts.len()))]
    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, anyhow::Error> {
        if texts.is_empty() {
            debug!("embed_batch empty input, skipping");
            return Ok(vec![]);
        }

        info!(batch_size = texts.len(), "step: embedding embed_batch request");

        let embeddings = self
            .request(EmbeddingInput::StringArray(texts.to_vec()), EMBED_BATCH_TIMEOUT)
            .await?;

        if embeddings.len() != texts.len() {
            warn!(
                expected = texts.len(),
                got = embeddings.len(),
                "embed_batch response count mismatch"
            );
            return Err(anyhow::anyhow!(
                "Expected {} embeddings, got {}",
                texts.len(),
                embeddings.len()
            ));
        }

        let dimension = embeddings.first().map(|v| v.len()).unwrap_or(0);
        info!(
            count = embeddings.len(),
            dimension,
            "step: embedding embed_batch done"
        );
        Ok(embeddings)
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}
