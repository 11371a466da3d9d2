//! # quotebot
//!
//! Game of Thrones quote chatbot. A user message is embedded, matched against the quote index,
//! and the top quotes plus the recent conversation are sent to a Groq-hosted LLM that replies in
//! character. Each user's history is persisted after every turn.
//!
//! ## Modules
//!
//! - [`config`] – QuoteBotConfig, EngineConfig (env driven)
//! - [`components`] – builds the index, LLM client and chat store
//! - [`engine`] – QuoteEngine, the per-user reply orchestrator
//! - [`registry`] – EngineRegistry, one engine per user identifier

pub mod components;
pub mod config;
pub mod engine;
pub mod registry;

pub use chat_history::{HistoryStats, DEFAULT_USER_ID};
pub use components::{build_components, build_index, build_llm_client, QuoteBotComponents};
pub use config::{
    chat_store_dir_from_env, log_file_from_env, EngineConfig, QuoteBotConfig, DEFAULT_LOG_FILE,
    DEFAULT_MIN_SCORE, DEFAULT_TOP_K,
};
pub use engine::QuoteEngine;
pub use registry::EngineRegistry;
