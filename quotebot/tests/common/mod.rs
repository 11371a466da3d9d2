#![allow(dead_code)]

use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use anyhow::Result;
use async_trait::async_trait;
use chat_history::ChatStore;
use embedding::EmbeddingService;
use llm_client::LlmClient;
use prompt::ChatMessage;
use quote_index::{BuildOptions, QuoteIndex};
use quote_store::Quote;
use quotebot::{EngineConfig, EngineRegistry};

const KEYWORDS: [&str; 5] = ["winter", "gold", "dragon", "night", "hodor"];

/// One dimension per keyword plus a bias term.
pub struct KeywordEmbedding {
    pub fail: AtomicBool,
}

impl KeywordEmbedding {
    pub fn new() -> Self {
        Self {
            fail: AtomicBool::new(false),
        }
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
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        if self.fail.load(Ordering::SeqCst) {
            anyhow::bail!("embedding provider unreachable");
        }
        Ok(Self::vectorise(text))
    }

    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        if self.fail.load(Ordering::SeqCst) {
            anyhow::bail!("embedding provider unreachable");
        }
        Ok(texts.iter().map(|t| Self::vectorise(t)).collect())
    }

    fn model_name(&self) -> &str {
        "keyword-test"
    }
}

/// Returns a fixed reply and records every request it receives.
pub struct ScriptedLlm {
    reply: Mutex<String>,
    pub fail: AtomicBool,
    requests: Mutex<Vec<Vec<ChatMessage>>>,
}

impl ScriptedLlm {
    pub fn replying(reply: &str) -> Self {
        Self {
            reply: Mutex::new(reply.to_string()),
            fail: AtomicBool::new(false),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn set_reply(&self, reply: &str) {
        *self.reply.lock().unwrap() = reply.to_string();
    }

    pub fn requests(&self) -> Vec<Vec<ChatMessage>> {
        self.requests.lock().unwrap().clone()
    }

    pub fn last_request(&self) -> Vec<ChatMessage> {
        self.requests().last().cloned().unwrap_or_default()
    }
}

#[async_trait]
impl LlmClient for ScriptedLlm {
    async fn get_llm_response_with_messages(&self, messages: Vec<ChatMessage>) -> Result<String> {
        self.requests.lock().unwrap().push(messages);
        if self.fail.load(Ordering::SeqCst) {
            anyhow::bail!("503 Service Unavailable");
        }
        Ok(self.reply.lock().unwrap().clone())
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

pub struct Fixture {
    pub embedder: Arc<KeywordEmbedding>,
    pub llm: Arc<ScriptedLlm>,
    pub index: Arc<QuoteIndex>,
    pub store: ChatStore,
}

impl Fixture {
    pub async fn new(root: &Path, reply: &str) -> Self {
        let embedder = Arc::new(KeywordEmbedding::new());
        let index = QuoteIndex::build_or_load(
            &sample_quotes(),
            root.join("quotes_index"),
            embedder.clone(),
            &BuildOptions::default(),
        )
        .await
        .unwrap();
        Self {
            embedder,
            llm: Arc::new(ScriptedLlm::replying(reply)),
            index: Arc::new(index),
            store: ChatStore::new(root.join("chat_history")),
        }
    }

    pub fn registry(&self, config: EngineConfig) -> EngineRegistry {
        EngineRegistry::from_parts(
            self.index.clone(),
            self.llm.clone(),
            self.store.clone(),
            config,
        )
    }
}
