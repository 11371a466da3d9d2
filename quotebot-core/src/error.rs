use thiserror::Error;

/// Instruction shown to the user when the LLM credential is absent.
pub const GROQ_KEY_INSTRUCTION: &str = "Please set the GROQ_API_KEY environment variable.";

#[derive(Error, Debug)]
pub enum QuoteBotError {
    /// Quote corpus missing or malformed. Fatal at startup.
    #[error("Quote data unavailable: {0}")]
    DataUnavailable(String),

    /// Embedding or index construction failed. Fatal at startup.
    #[error("Index build failed: {0}")]
    IndexBuildFailure(String),

    /// Retrieval or LLM call failed. Recovered by the orchestrator with a fallback reply.
    #[error("Generation failed: {0}")]
    GenerationFailure(String),

    /// Required API credential absent. Fatal at startup.
    #[error("Missing credential: {0}")]
    MissingCredential(String),

    #[error("Chat history error: {0}")]
    History(String),

    #[error("Config error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl QuoteBotError {
    /// True for errors that must abort startup (everything except generation failures).
    pub fn is_fatal(&self) -> bool {
        !matches!(self, QuoteBotError::GenerationFailure(_))
    }
}

pub type Result<T> = std::result::Result<T, QuoteBotError>;
