//! Integration tests for [`openai_embedding::OpenAIEmbedding`].
//!
//! Tests that hit a real endpoint are `#[ignore]`d and need `EMBEDDING_API_KEY` or `OPENAI_API_KEY`
//! (root `.env` is loaded). Run with `cargo test -p openai-embedding -- --ignored`.

use std::path::Path;

use embedding::{EmbeddingService, EnvEmbeddingConfig, DEFAULT_EMBEDDING_MODEL};
use openai_embedding::OpenAIEmbedding;

fn load_root_env() {
    let root_env = Path::new(env!("CARGO_MANIFEST_DIR")).join("../../../.env");
    let _ = dotenvy::from_path(root_env);
}

fn is_quota_or_billing_error(e: &anyhow::Error) -> bool {
    let s = e.to_string();
    s.contains("insufficient_quota") || s.contains("billing") || s.contains("rate_limit")
}

#[test]
fn from_config_uses_configured_model() {
    let config = EnvEmbeddingConfig {
        embedding_model: "sentence-transformers/all-MiniLM-L6-v2".to_string(),
        embedding_api_key: String::new(),
        embedding_base_url: Some("http://localhost:8080/v1".to_string()),
    };
    let service = OpenAIEmbedding::from_config(&config);
    assert_eq!(service.model(), "sentence-transformers/all-MiniLM-L6-v2");
    assert_eq!(service.model_name(), service.model());
}

#[test]
fn from_config_falls_back_to_default_model() {
    let config = EnvEmbeddingConfig {
        embedding_model: String::new(),
        embedding_api_key: "sk-test".to_string(),
        embedding_base_url: None,
    };
    let service = OpenAIEmbedding::from_config(&config);
    assert_eq!(service.model(), DEFAULT_EMBEDDING_MODEL);
}

#[tokio::test]
async fn embed_batch_empty_input_makes_no_request() {
    // Unroutable base URL: any network call would fail.
    let service = OpenAIEmbedding::new_with_base_url(
        "sk-test".to_string(),
        DEFAULT_EMBEDDING_MODEL.to_string(),
        Some("http://127.0.0.1:9/v1"),
    );
    let result = service.embed_batch(&[]).await.unwrap();
    assert!(result.is_empty());
}

#[tokio::test]
#[ignore] // Requires API key and quota
async fn embed_batch_preserves_order_against_real_api() {
    load_root_env();
    let config = EnvEmbeddingConfig::from_env().unwrap();
    if config.validate().is_err() {
        eprintln!("skipped: no embedding credential");
        return;
    }
    let service = OpenAIEmbedding::from_config(&config);
    let texts = vec!["Winter is coming.".to_string(), "A Lannister always pays his debts.".to_string()];

    match service.embed_batch(&texts).await {
        Ok(vectors) => {
            assert_eq!(vectors.len(), 2);
            assert!(!vectors[0].is_empty());
            assert_eq!(vectors[0].len(), vectors[1].len());
        }
        Err(e) if is_quota_or_billing_error(&e) => {
            eprintln!("skipped: quota/billing limit ({})", e);
        }
        Err(e) => panic!("embed_batch failed: {}", e),
    }
}
