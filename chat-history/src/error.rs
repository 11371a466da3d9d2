//! History error types.

use thiserror::Error;

/// Errors raised while reading or writing chat history.
#[derive(Error, Debug)]
pub enum HistoryError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Serialization(String),
    /// A history file or imported message list that is not valid JSON of the expected shape.
    #[error("Deserialization error: {0}")]
    Deserialization(String),
}

impl From<HistoryError> for quotebot_core::QuoteBotError {
    fn from(e: HistoryError) -> Self {
        quotebot_core::QuoteBotError::History(e.to_string())
    }
}
