//! Chat history crate: per-user message log on disk and the windowed view used for prompting.
//!
//! ## Modules
//!
//! - [`error`] – History error types
//! - [`models`] – HistoryFile, HistoryStats
//! - [`store`] – ChatStore (one JSON file per user identifier)
//! - [`conversation`] – ConversationHistory (in-memory log, persisted after every mutation)
//! - [`memory_buffer`] – ChatMemoryBuffer, token estimation

mod conversation;
mod error;
mod memory_buffer;
mod models;
mod store;


pub use conversation::ConversationHistory;
pub use error::HistoryError;
pub use memory_buffer::{estimate_tokens, ChatMemoryBuffer, DEFAULT_TOKEN_LIMIT};
pub use models::{HistoryFile, HistoryStats};
pub use store::{encode_user_id, parse_messages, ChatStore, DEFAULT_CHAT_STORE_DIR};

/// User identifier used when the caller does not supply one.
pub const DEFAULT_USER_ID: &str = "default";
