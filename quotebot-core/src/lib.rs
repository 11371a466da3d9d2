//! # quotebot-core
//!
//! Shared error type ([`QuoteBotError`]), tracing initialisation and atomic JSON file replacement
//! for the quote bot.
//! Every other crate in the workspace reports startup and generation failures through
//! this taxonomy.

pub mod error;
pub mod logger;
pub mod persist;

pub use error::{QuoteBotError, Result, GROQ_KEY_INSTRUCTION};
pub use logger::init_tracing;
pub use persist::write_json_atomic;
