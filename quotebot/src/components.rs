//! Component factory: corpus, embedder, index, LLM client and chat store from config.

use std::sync::Arc;

use chat_history::ChatStore;
use embedding::EmbeddingService;
use llm_client::{LlmClient, OpenAILlmClient};
use openai_embedding::OpenAIEmbedding;
use quote_index::{BuildOptions, QuoteIndex};
use quote_store::load_quotes;
use quotebot_core::Result;
use tracing::{info, instrument};

use crate::config::QuoteBotConfig;

/// Shared dependencies for every per-user engine.
pub struct QuoteBotComponents {
    pub index: Arc<QuoteIndex>,
    pub llm: Arc<dyn LlmClient>,
    pub store: ChatStore,
}

/// Loads the corpus and builds or loads the index. Fails with `DataUnavailable` or
/// `IndexBuildFailure`.
#[instrument(skip(config), fields(quotes_path = %config.quotes_path.display(), index_dir = %config.index_dir.display()))]
pub async fn build_index(config: &QuoteBotConfig, force_rebuild: bool) -> Result<Arc<QuoteIndex>> {
    let quotes = load_quotes(&config.quotes_path)?;
    let embedder: Arc<dyn EmbeddingService> = Arc::new(OpenAIEmbedding::from_config(&config.embedding));
    let options = BuildOptions {
        batch_size: config.embed_batch_size,
        force_rebuild,
    };
    let index = QuoteIndex::build_or_load(&quotes, &config.index_dir, embedder, &options).await?;
    info!(
        documents = index.len(),
        source = ?index.source(),
        model = %index.model(),
        "Quote index ready"
    );
    Ok(Arc::new(index))
}

pub fn build_llm_client(config: &QuoteBotConfig) -> Arc<dyn LlmClient> {
    Arc::new(
        OpenAILlmClient::from_config(&config.llm)
            .with_model(config.engine.model.clone())
            .with_temperature(config.engine.temperature),
    )
}

#[instrument(skip(config))]
pub async fn build_components(config: &QuoteBotConfig) -> Result<QuoteBotComponents> {
    let index = build_index(config, false).await?;
    let llm = build_llm_client(config);
    let store = ChatStore::new(&config.chat_store_dir);
    info!(
        model = %config.engine.model,
        chat_store_dir = %config.chat_store_dir.display(),
        "Components ready"
    );
    Ok(QuoteBotComponents { index, llm, store })
}
