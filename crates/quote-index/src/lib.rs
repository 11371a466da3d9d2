//! # Quote Index
//!
//! Wraps each quote as a [`Document`] (text = sentence, metadata = character), embeds the corpus
//! through an [`embedding::EmbeddingService`], persists the result to an index directory and
//! serves top-k cosine-similarity retrieval.
//!
//! ## Persisted artifacts
//!
//! | File | Content |
//! |------|---------|
//! | `docstore.json` | documents (id, text, metadata) |
//! | `default__vector_store.json` | embedding per document id |
//! | `index_store.json` | index id, embedding model, dimension, ordered document ids |
//!
//! A directory missing any of the three is rebuilt from scratch. A complete directory whose
//! documents or embedding model no longer match the current corpus is rebuilt too.

mod document;
mod index;
mod similarity;
mod storage;

pub use document::{quotes_to_documents, Document, DocumentMetadata, IndexedDocument};
pub use index::{BuildOptions, IndexSource, QuoteIndex, ScoredQuote, DEFAULT_EMBED_BATCH_SIZE};
pub use similarity::cosine_similarity;
pub use storage::{
    has_persistent_index, DOCSTORE_FILE, INDEX_STORE_FILE, REQUIRED_FILES, VECTOR_STORE_FILE,
};

/// Default index directory, relative to the working directory.
pub const DEFAULT_INDEX_DIR: &str = "quotes_index";
