//! Application and engine configuration loaded from environment variables.

use std::env;
use std::path::PathBuf;

use chat_history::{DEFAULT_CHAT_STORE_DIR, DEFAULT_TOKEN_LIMIT};
use embedding::EnvEmbeddingConfig;
use llm_client::{EnvLlmConfig, DEFAULT_LLM_MODEL, DEFAULT_TEMPERATURE};
use prompt::{DEFAULT_FALLBACK_REPLY, DEFAULT_PERSONA_PROMPT};
use quote_index::{DEFAULT_EMBED_BATCH_SIZE, DEFAULT_INDEX_DIR};
use quote_store::DEFAULT_QUOTES_PATH;
use quotebot_core::{QuoteBotError, Result};

pub const DEFAULT_TOP_K: usize = 5;
/// Retrieved quotes scoring below this cosine similarity are left out of the prompt.
pub const DEFAULT_MIN_SCORE: f32 = 0.2;
pub const DEFAULT_LOG_FILE: &str = "logs/quotebot.log";

/// Per-turn generation settings.
#[derive(Debug, Clone, PartialEq)]
pub struct EngineConfig {
    pub model: String,
    pub temperature: f32,
    /// Context-window budget in estimated tokens.
    pub token_limit: usize,
    /// Quotes retrieved per message.
    pub top_k: usize,
    /// Similarity floor for retrieved quotes. When nothing clears it the prompt asks for a
    /// mysterious in-character reply instead.
    pub min_score: f32,
    pub persona_prompt: String,
    pub fallback_reply: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            model: DEFAULT_LLM_MODEL.to_string(),
            temperature: DEFAULT_TEMPERATURE,
            token_limit: DEFAULT_TOKEN_LIMIT,
            top_k: DEFAULT_TOP_K,
            min_score: DEFAULT_MIN_SCORE,
            persona_prompt: DEFAULT_PERSONA_PROMPT.to_string(),
            fallback_reply: DEFAULT_FALLBACK_REPLY.to_string(),
        }
    }
}

/// Everything the bot needs at startup.
#[derive(Debug, Clone)]
pub struct QuoteBotConfig {
    pub quotes_path: PathBuf,
    pub index_dir: PathBuf,
    pub chat_store_dir: PathBuf,
    pub log_file: String,
    pub embed_batch_size: usize,
    pub llm: EnvLlmConfig,
    pub embedding: EnvEmbeddingConfig,
    pub engine: EngineConfig,
}

impl QuoteBotConfig {
    /// Loads the full configuration. A missing `GROQ_API_KEY` or embedding key is
    /// [`QuoteBotError::MissingCredential`]; unparsable numbers are [`QuoteBotError::Config`].
    pub fn from_env() -> Result<Self> {
        let llm = EnvLlmConfig::from_env()?;
        let embedding =
            EnvEmbeddingConfig::from_env().map_err(|e| QuoteBotError::Config(e.to_string()))?;
        embedding
            .validate()
            .map_err(|e| QuoteBotError::MissingCredential(e.to_string()))?;

        let engine = EngineConfig {
            model: llm.llm_model.clone(),
            temperature: llm.llm_temperature,
            token_limit: positive_usize_from_env("CHAT_TOKEN_LIMIT", DEFAULT_TOKEN_LIMIT)?,
            top_k: positive_usize_from_env("TOP_K", DEFAULT_TOP_K)?,
            min_score: score_from_env("MIN_SCORE", DEFAULT_MIN_SCORE)?,
            ..EngineConfig::default()
        };

        Ok(Self {
            quotes_path: path_from_env("QUOTES_PATH", DEFAULT_QUOTES_PATH),
            index_dir: path_from_env("INDEX_DIR", DEFAULT_INDEX_DIR),
            chat_store_dir: chat_store_dir_from_env(),
            log_file: log_file_from_env(),
            embed_batch_size: positive_usize_from_env("EMBED_BATCH_SIZE", DEFAULT_EMBED_BATCH_SIZE)?,
            llm,
            embedding,
            engine,
        })
    }
}

/// `CHAT_STORE_DIR`, for commands that only touch stored history.
pub fn chat_store_dir_from_env() -> PathBuf {
    path_from_env("CHAT_STORE_DIR", DEFAULT_CHAT_STORE_DIR)
}

pub fn log_file_from_env() -> String {
    non_empty_var("LOG_FILE").unwrap_or_else(|| DEFAULT_LOG_FILE.to_string())
}

fn non_empty_var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|s| !s.trim().is_empty())
}

fn path_from_env(name: &str, default: &str) -> PathBuf {
    PathBuf::from(non_empty_var(name).unwrap_or_else(|| default.to_string()))
}

fn positive_usize_from_env(name: &str, default: usize) -> Result<usize> {
    match non_empty_var(name) {
        None => Ok(default),
        Some(raw) => match raw.trim().parse::<usize>() {
            Ok(v) if v > 0 => Ok(v),
            _ => Err(QuoteBotError::Config(format!(
                "{}={:?} must be a positive integer",
                name, raw
            ))),
        },
    }
}

fn score_from_env(name: &str, default: f32) -> Result<f32> {
    match non_empty_var(name) {
        None => Ok(default),
        Some(raw) => match raw.trim().parse::<f32>() {
            Ok(v) if (-1.0..=1.0).contains(&v) => Ok(v),
            _ => Err(QuoteBotError::Config(format!(
                "{}={:?} must be a number between -1 and 1",
                name, raw
            ))),
        },
    }
}
