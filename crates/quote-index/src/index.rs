//! Index construction, reload and retrieval.

use std::fs;
use std::path::Path;
use std::sync::Arc;

use anyhow::bail;
use chrono::Utc;
use embedding::EmbeddingService;
use quote_store::Quote;
use quotebot_core::{QuoteBotError, Result};
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

use crate::document::{quotes_to_documents, IndexedDocument};
use crate::similarity::cosine_similarity;
use crate::storage::{has_persistent_index, read_index, write_index, IndexStoreFile};

/// Quotes per embedding provider call while building.
pub const DEFAULT_EMBED_BATCH_SIZE: usize = 64;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildOptions {
    pub batch_size: usize,
    /// Ignore any persisted index and rebuild.
    pub force_rebuild: bool,
}

impl Default for BuildOptions {
    fn default() -> Self {
        Self {
            batch_size: DEFAULT_EMBED_BATCH_SIZE,
            force_rebuild: false,
        }
    }
}

/// How the index in memory came to be.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexSource {
    Built,
    Loaded,
}

/// A retrieved quote and its cosine similarity to the query.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredQuote {
    pub quote: Quote,
    pub score: f32,
}

/// Embedded quote corpus. Read-only after construction; share it behind an `Arc`.
pub struct QuoteIndex {
    index_id: Uuid,
    documents: Vec<IndexedDocument>,
    dimension: usize,
    model: String,
    source: IndexSource,
    embedder: Arc<dyn EmbeddingService>,
}

impl std::fmt::Debug for QuoteIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QuoteIndex")
            .field("index_id", &self.index_id)
            .field("documents", &self.documents.len())
            .field("dimension", &self.dimension)
            .field("model", &self.model)
            .field("source", &self.source)
            .finish()
    }
}

impl QuoteIndex {
    /// Loads the persisted index from `index_dir` when it is complete and still matches `quotes`
    /// and the embedder's model; otherwise embeds every quote and persists a fresh index.
    #[instrument(skip(quotes, index_dir, embedder), fields(quotes = quotes.len(), index_dir = %index_dir.as_ref().display()))]
    pub async fn build_or_load(
        quotes: &[Quote],
        index_dir: impl AsRef<Path>,
        embedder: Arc<dyn EmbeddingService>,
        options: &BuildOptions,
    ) -> Result<Self> {
        let index_dir = index_dir.as_ref();

        if options.force_rebuild {
            info!("step: index forced rebuild");
        } else if !has_persistent_index(index_dir) {
            info!("step: index artifacts incomplete, building");
        } else {
            match Self::load(quotes, index_dir, embedder.clone()) {
                Ok(index) => return Ok(index),
                Err(e) => warn!(error = %e, "persisted index unusable, rebuilding"),
            }
        }

        Self::build(quotes, index_dir, embedder, options.batch_size).await
    }

    /// Embeds every quote and persists the index to `index_dir` (created if missing).
    ///
    /// Fails with [`QuoteBotError::IndexBuildFailure`] for an empty corpus, an unreachable or
    /// inconsistent embedding provider, or a persistence error.
    pub async fn build(
        quotes: &[Quote],
        index_dir: &Path,
        embedder: Arc<dyn EmbeddingService>,
        batch_size: usize,
    ) -> Result<Self> {
        if quotes.is_empty() {
            return Err(QuoteBotError::IndexBuildFailure(
                "quote corpus is empty".to_string(),
            ));
        }
        fs::create_dir_all(index_dir).map_err(|e| {
            QuoteBotError::IndexBuildFailure(format!(
                "cannot create {}: {}",
                index_dir.display(),
                e
            ))
        })?;

        let docs = quotes_to_documents(quotes);
        let batch_size = batch_size.max(1);
        let batch_count = docs.len().div_ceil(batch_size);
        let mut documents = Vec::with_capacity(docs.len());

        for (batch_index, chunk) in docs.chunks(batch_size).enumerate() {
            let texts: Vec<String> = chunk.iter().map(|d| d.text.clone()).collect();
            let vectors = embedder.embed_batch(&texts).await.map_err(|e| {
                QuoteBotError::IndexBuildFailure(format!("embedding provider failed: {}", e))
            })?;
            if vectors.len() != chunk.len() {
                return Err(QuoteBotError::IndexBuildFailure(format!(
                    "embedding provider returned {} vectors for {} quotes",
                    vectors.len(),
                    chunk.len()
                )));
            }
            documents.extend(
                chunk
                    .iter()
                    .cloned()
                    .zip(vectors)
                    .map(|(document, embedding)| IndexedDocument {
                        document,
                        embedding,
                    }),
            );
            info!(
                batch = batch_index + 1,
                batches = batch_count,
                embedded = documents.len(),
                total = docs.len(),
                "step: index embedding progress"
            );
        }

        let dimension = documents.first().map(|d| d.embedding.len()).unwrap_or(0);
        if dimension == 0 {
            return Err(QuoteBotError::IndexBuildFailure(
                "embedding provider returned empty vectors".to_string(),
            ));
        }
        if let Some(bad) = documents.iter().find(|d| d.embedding.len() != dimension) {
            return Err(QuoteBotError::IndexBuildFailure(format!(
                "inconsistent embedding dimension: {} vs {}",
                bad.embedding.len(),
                dimension
            )));
        }

        let info = IndexStoreFile {
            index_id: Uuid::new_v4(),
            embedding_model: embedder.model_name().to_string(),
            dimension,
            doc_ids: documents.iter().map(|d| d.document.id.clone()).collect(),
            created_at: Utc::now(),
        };
        write_index(index_dir, &info, &documents).map_err(|e| {
            QuoteBotError::IndexBuildFailure(format!(
                "cannot persist index to {}: {}",
                index_dir.display(),
                e
            ))
        })?;

        info!(
            index_id = %info.index_id,
            documents = documents.len(),
            dimension,
            "step: index built and persisted"
        );

        Ok(Self {
            index_id: info.index_id,
            documents,
            dimension,
            model: info.embedding_model,
            source: IndexSource::Built,
            embedder,
        })
    }

    /// Loads a persisted index without embedding anything.
    ///
    /// Errors when artifacts are unreadable or inconsistent, or when the stored documents or
    /// embedding model differ from `quotes` / `embedder` (a stale index).
    pub fn load(
        quotes: &[Quote],
        index_dir: &Path,
        embedder: Arc<dyn EmbeddingService>,
    ) -> anyhow::Result<Self> {
        let persisted = read_index(index_dir)?;

        if persisted.info.embedding_model != embedder.model_name() {
            bail!(
                "index was embedded with {:?}, configured model is {:?}",
                persisted.info.embedding_model,
                embedder.model_name()
            );
        }
        let same_corpus = persisted.documents.len() == quotes.len()
            && persisted
                .documents
                .iter()
                .zip(quotes)
                .all(|(d, q)| d.document.matches(q));
        if !same_corpus {
            bail!(
                "persisted index holds {} documents that do not match the current {} quotes",
                persisted.documents.len(),
                quotes.len()
            );
        }

        info!(
            index_id = %persisted.info.index_id,
            documents = persisted.documents.len(),
            dimension = persisted.info.dimension,
            "step: index loaded from storage"
        );

        Ok(Self {
            index_id: persisted.info.index_id,
            documents: persisted.documents,
            dimension: persisted.info.dimension,
            model: persisted.info.embedding_model,
            source: IndexSource::Loaded,
            embedder,
        })
    }

    /// Embeds `query` and returns the `top_k` most similar quotes, best first.
    #[instrument(skip(self, query), fields(query_len = query.len()))]
    pub async fn retrieve(&self, query: &str, top_k: usize) -> anyhow::Result<Vec<ScoredQuote>> {
        let query_embedding = self.embedder.embed(query).await?;
        if query_embedding.len() != self.dimension {
            bail!(
                "query embedding has dimension {}, index expects {}",
                query_embedding.len(),
                self.dimension
            );
        }
        let hits = self.search(&query_embedding, top_k);
        debug!(hits = hits.len(), "step: index retrieve done");
        Ok(hits)
    }

    /// Ranks all documents against a precomputed query embedding.
    pub fn search(&self, query_embedding: &[f32], top_k: usize) -> Vec<ScoredQuote> {
        let mut scored: Vec<(f32, &IndexedDocument)> = self
            .documents
            .iter()
            .map(|d| (cosine_similarity(query_embedding, &d.embedding), d))
            .collect();

        // Stable sort keeps corpus order among equal scores.
        scored.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(std::cmp::Ordering::Equal));

        scored
            .into_iter()
            .take(top_k)
            .map(|(score, d)| ScoredQuote {
                quote: d.document.to_quote(),
                score,
            })
            .collect()
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    pub fn dimension(&self) -> usize {
        self.dimension
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn source(&self) -> IndexSource {
        self.source
    }

    pub fn index_id(&self) -> Uuid {
        self.index_id
    }

    pub fn documents(&self) -> &[IndexedDocument] {
        &self.documents
    }
}
