mod common;

use std::fs;
use std::sync::Arc;

use common::{sample_quotes, KeywordEmbedding};
use quote_index::{
    has_persistent_index, BuildOptions, IndexSource, QuoteIndex, REQUIRED_FILES,
};
use quote_store::Quote;
use quotebot_core::QuoteBotError;
use tempfile::TempDir;

fn opts() -> BuildOptions {
    BuildOptions::default()
}

#[tokio::test]
async fn fresh_build_writes_all_artifacts() {
    let dir = TempDir::new().unwrap();
    let index_dir = dir.path().join("quotes_index");
    let embedder = Arc::new(KeywordEmbedding::new());

    let index = QuoteIndex::build_or_load(&sample_quotes(), &index_dir, embedder.clone(), &opts())
        .await
        .unwrap();

    assert_eq!(index.source(), IndexSource::Built);
    assert_eq!(index.len(), 5);
    assert_eq!(index.dimension(), 7);
    assert_eq!(index.model(), "keyword-test");
    for file in REQUIRED_FILES {
        assert!(index_dir.join(file).is_file(), "{} missing", file);
    }
    assert!(has_persistent_index(&index_dir));
}

#[tokio::test]
async fn reload_does_not_call_embedding_provider() {
    let dir = TempDir::new().unwrap();
    let quotes = sample_quotes();

    let first = QuoteIndex::build_or_load(
        &quotes,
        dir.path(),
        Arc::new(KeywordEmbedding::new()),
        &opts(),
    )
    .await
    .unwrap();

    let embedder = Arc::new(KeywordEmbedding::new());
    let second = QuoteIndex::build_or_load(&quotes, dir.path(), embedder.clone(), &opts())
        .await
        .unwrap();

    assert_eq!(second.source(), IndexSource::Loaded);
    assert_eq!(embedder.batch_calls(), 0);
    assert_eq!(second.index_id(), first.index_id());
    assert_eq!(second.documents(), first.documents());
}

#[tokio::test]
async fn missing_any_artifact_triggers_rebuild() {
    let quotes = sample_quotes();
    for missing in REQUIRED_FILES {
        let dir = TempDir::new().unwrap();
        let first = QuoteIndex::build_or_load(
            &quotes,
            dir.path(),
            Arc::new(KeywordEmbedding::new()),
            &opts(),
        )
        .await
        .unwrap();
        fs::remove_file(dir.path().join(missing)).unwrap();

        let embedder = Arc::new(KeywordEmbedding::new());
        let rebuilt = QuoteIndex::build_or_load(&quotes, dir.path(), embedder.clone(), &opts())
            .await
            .unwrap();

        assert_eq!(rebuilt.source(), IndexSource::Built, "after removing {}", missing);
        assert!(embedder.batch_calls() > 0);
        assert_ne!(rebuilt.index_id(), first.index_id());
        assert!(has_persistent_index(dir.path()));
    }
}

#[tokio::test]
async fn corrupt_artifact_triggers_rebuild() {
    let dir = TempDir::new().unwrap();
    let quotes = sample_quotes();
    QuoteIndex::build_or_load(&quotes, dir.path(), Arc::new(KeywordEmbedding::new()), &opts())
        .await
        .unwrap();
    fs::write(dir.path().join("docstore.json"), "{ not json").unwrap();

    let index = QuoteIndex::build_or_load(
        &quotes,
        dir.path(),
        Arc::new(KeywordEmbedding::new()),
        &opts(),
    )
    .await
    .unwrap();
    assert_eq!(index.source(), IndexSource::Built);
}

#[tokio::test]
async fn empty_corpus_is_build_failure() {
    let dir = TempDir::new().unwrap();
    let err = QuoteIndex::build_or_load(&[], dir.path(), Arc::new(KeywordEmbedding::new()), &opts())
        .await
        .unwrap_err();
    assert!(matches!(err, QuoteBotError::IndexBuildFailure(_)));
    assert!(err.is_fatal());
}

#[tokio::test]
async fn unreachable_provider_is_build_failure() {
    let dir = TempDir::new().unwrap();
    let err = QuoteIndex::build_or_load(
        &sample_quotes(),
        dir.path(),
        Arc::new(KeywordEmbedding::failing()),
        &opts(),
    )
    .await
    .unwrap_err();
    assert!(matches!(err, QuoteBotError::IndexBuildFailure(_)));
    assert!(!has_persistent_index(dir.path()));
}

#[tokio::test]
async fn changed_corpus_triggers_rebuild() {
    let dir = TempDir::new().unwrap();
    let mut quotes = sample_quotes();
    QuoteIndex::build_or_load(&quotes, dir.path(), Arc::new(KeywordEmbedding::new()), &opts())
        .await
        .unwrap();

    quotes.push(Quote::new("The night's watch guards the wall.", "Jon Snow"));
    let index = QuoteIndex::build_or_load(
        &quotes,
        dir.path(),
        Arc::new(KeywordEmbedding::new()),
        &opts(),
    )
    .await
    .unwrap();

    assert_eq!(index.source(), IndexSource::Built);
    assert_eq!(index.len(), 6);
}

#[tokio::test]
async fn changed_model_triggers_rebuild() {
    let dir = TempDir::new().unwrap();
    let quotes = sample_quotes();
    QuoteIndex::build_or_load(&quotes, dir.path(), Arc::new(KeywordEmbedding::new()), &opts())
        .await
        .unwrap();

    let index = QuoteIndex::build_or_load(
        &quotes,
        dir.path(),
        Arc::new(KeywordEmbedding::with_model("keyword-test-v2")),
        &opts(),
    )
    .await
    .unwrap();

    assert_eq!(index.source(), IndexSource::Built);
    assert_eq!(index.model(), "keyword-test-v2");
}

#[tokio::test]
async fn force_rebuild_ignores_persisted_index() {
    let dir = TempDir::new().unwrap();
    let quotes = sample_quotes();
    QuoteIndex::build_or_load(&quotes, dir.path(), Arc::new(KeywordEmbedding::new()), &opts())
        .await
        .unwrap();

    let options = BuildOptions {
        force_rebuild: true,
        ..BuildOptions::default()
    };
    let index = QuoteIndex::build_or_load(
        &quotes,
        dir.path(),
        Arc::new(KeywordEmbedding::new()),
        &options,
    )
    .await
    .unwrap();
    assert_eq!(index.source(), IndexSource::Built);
}

#[tokio::test]
async fn small_batches_cover_whole_corpus() {
    let dir = TempDir::new().unwrap();
    let embedder = Arc::new(KeywordEmbedding::new());
    let options = BuildOptions {
        batch_size: 2,
        ..BuildOptions::default()
    };
    let index = QuoteIndex::build_or_load(&sample_quotes(), dir.path(), embedder.clone(), &options)
        .await
        .unwrap();
    assert_eq!(index.len(), 5);
    assert_eq!(embedder.batch_calls(), 3);
}

#[tokio::test]
async fn retrieve_ranks_by_similarity() {
    let dir = TempDir::new().unwrap();
    let index = QuoteIndex::build_or_load(
        &sample_quotes(),
        dir.path(),
        Arc::new(KeywordEmbedding::new()),
        &opts(),
    )
    .await
    .unwrap();

    let hits = index.retrieve("Tell me about dragons", 3).await.unwrap();
    assert_eq!(hits.len(), 3);
    assert_eq!(hits[0].quote.character, "Daenerys Targaryen");
    assert!(hits[0].score > hits[1].score);
    assert!(hits.windows(2).all(|w| w[0].score >= w[1].score));

    let all = index.retrieve("winter", 10).await.unwrap();
    assert_eq!(all.len(), 5);
    assert_eq!(all[0].quote.sentence, "Winter is coming.");
}

#[tokio::test]
async fn retrieve_surfaces_provider_errors() {
    let dir = TempDir::new().unwrap();
    let embedder = Arc::new(KeywordEmbedding::new());
    let index = QuoteIndex::build_or_load(&sample_quotes(), dir.path(), embedder.clone(), &opts())
        .await
        .unwrap();

    embedder.fail.store(true, std::sync::atomic::Ordering::SeqCst);
    assert!(index.retrieve("winter", 3).await.is_err());
}
