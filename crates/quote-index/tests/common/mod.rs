use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;
use embedding::EmbeddingService;
use quote_store::Quote;

const KEYWORDS: [&str; 6] = ["winter", "gold", "dragon", "wall", "night", "hodor"];

/// Bag-of-keywords embedding: one dimension per keyword plus a small bias so no vector is zero.
pub struct KeywordEmbedding {
    model: String,
    pub embed_calls: AtomicUsize,
    pub batch_calls: AtomicUsize,
    pub fail: AtomicBool,
}

impl KeywordEmbedding {
    pub fn new() -> Self {
        Self::with_model("keyword-test")
    }

    pub fn with_model(model: &str) -> Self {
        Self {
            model: model.to_string(),
            embed_calls: AtomicUsize::new(0),
            batch_calls: AtomicUsize::new(0),
            fail: AtomicBool::new(false),
        }
    }

    pub fn failing() -> Self {
        let e = Self::new();
        e.fail.store(true, Ordering::SeqCst);
        e
    }

    pub fn batch_calls(&self) -> usize {
        self.batch_calls.load(Ordering::SeqCst)
    }

    fn vectorise(text: &str) -> Vec<f32> {
        let lower = text.to_lowercase();
        let mut v: Vec<f32> = KEYWORDS
            .iter()
            .map(|k| lower.matches(k).count() as f32)
            .collect();
        v.push(0.01);
        v
    }
}

#[async_trait]
impl EmbeddingService for KeywordEmbedding {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, anyhow::Error> {
        self.embed_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail.load(Ordering::SeqCst) {
            anyhow::bail!("embedding provider unreachable");
        }
        Ok(Self::vectorise(text))
    }

    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, anyhow::Error> {
        self.batch_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail.load(Ordering::SeqCst) {
            anyhow::bail!("embedding provider unreachable");
        }
        Ok(texts.iter().map(|t| Self::vectorise(t)).collect())
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}

pub fn sample_quotes() -> Vec<Quote> {
    vec![
        Quote::new("Winter is coming.", "Eddard Stark"),
        Quote::new("A Lannister always pays his debts in gold.", "Tyrion Lannister"),
        Quote::new("I am the blood of the dragon.", "Daenerys Targaryen"),
        Quote::new("The night is dark and full of terrors.", "Melisandre"),
        Quote::new("Hodor.", "Hodor"),
    ]
}
