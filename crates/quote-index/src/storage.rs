//! On-disk layout of a persisted index.

use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::Path;

use anyhow::{bail, Context};
use chrono::{DateTime, Utc};
use quotebot_core::write_json_atomic;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use uuid::Uuid;

use crate::document::{Document, IndexedDocument};

pub const DOCSTORE_FILE: &str = "docstore.json";
pub const VECTOR_STORE_FILE: &str = "default__vector_store.json";
pub const INDEX_STORE_FILE: &str = "index_store.json";

/// Every file a persisted index must contain to be loadable.
pub const REQUIRED_FILES: [&str; 3] = [DOCSTORE_FILE, VECTOR_STORE_FILE, INDEX_STORE_FILE];

/// True only when `index_dir` exists and holds all of [`REQUIRED_FILES`] as regular files.
pub fn has_persistent_index(index_dir: &Path) -> bool {
    index_dir.is_dir() && REQUIRED_FILES.iter().all(|f| index_dir.join(f).is_file())
}

#[derive(Serialize, Deserialize)]
struct DocStoreFile {
    documents: Vec<Document>,
}

#[derive(Serialize, Deserialize)]
struct VectorStoreFile {
    embedding_dict: BTreeMap<String, Vec<f32>>,
}

/// Index metadata; written last so a complete file set implies the other two are in place.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct IndexStoreFile {
    pub index_id: Uuid,
    pub embedding_model: String,
    pub dimension: usize,
    pub doc_ids: Vec<String>,
    pub created_at: DateTime<Utc>,
}

pub(crate) struct PersistedIndex {
    pub info: IndexStoreFile,
    pub documents: Vec<IndexedDocument>,
}

pub(crate) fn write_index(
    index_dir: &Path,
    info: &IndexStoreFile,
    documents: &[IndexedDocument],
) -> std::io::Result<()> {
    let docstore = DocStoreFile {
        documents: documents.iter().map(|d| d.document.clone()).collect(),
    };
    let vectors = VectorStoreFile {
        embedding_dict: documents
            .iter()
            .map(|d| (d.document.id.clone(), d.embedding.clone()))
            .collect(),
    };
    write_json_atomic(&index_dir.join(DOCSTORE_FILE), &docstore)?;
    write_json_atomic(&index_dir.join(VECTOR_STORE_FILE), &vectors)?;
    write_json_atomic(&index_dir.join(INDEX_STORE_FILE), info)?;
    Ok(())
}

fn read_json<T: DeserializeOwned>(path: &Path) -> anyhow::Result<T> {
    let raw = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("parse {}", path.display()))
}

/// Reads all three artifacts and cross-checks them (ids, counts, dimensions).
pub(crate) fn read_index(index_dir: &Path) -> anyhow::Result<PersistedIndex> {
    let info: IndexStoreFile = read_json(&index_dir.join(INDEX_STORE_FILE))?;
    let docstore: DocStoreFile = read_json(&index_dir.join(DOCSTORE_FILE))?;
    let mut vectors: VectorStoreFile = read_json(&index_dir.join(VECTOR_STORE_FILE))?;

    if info.dimension == 0 {
        bail!("index_store records zero embedding dimension");
    }

    let mut by_id: HashMap<String, Document> = docstore
        .documents
        .into_iter()
        .map(|d| (d.id.clone(), d))
        .collect();

    let mut documents = Vec::with_capacity(info.doc_ids.len());
    for id in &info.doc_ids {
        let document = by_id
            .remove(id)
            .with_context(|| format!("document {} missing from docstore", id))?;
        let embedding = vectors
            .embedding_dict
            .remove(id)
            .with_context(|| format!("embedding for {} missing from vector store", id))?;
        if embedding.len() != info.dimension {
            bail!(
                "embedding for {} has dimension {}, expected {}",
                id,
                embedding.len(),
                info.dimension
            );
        }
        documents.push(IndexedDocument {
            document,
            embedding,
        });
    }

    if !by_id.is_empty() || !vectors.embedding_dict.is_empty() {
        bail!(
            "persisted index has {} unreferenced documents and {} unreferenced embeddings",
            by_id.len(),
            vectors.embedding_dict.len()
        );
    }

    Ok(PersistedIndex { info, documents })
}
