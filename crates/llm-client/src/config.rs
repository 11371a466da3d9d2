//! LLM configuration: trait and env-based implementation.

use quotebot_core::{QuoteBotError, Result, GROQ_KEY_INSTRUCTION};
use std::env;

pub const DEFAULT_LLM_BASE_URL: &str = "https://api.groq.com/openai/v1";
pub const DEFAULT_LLM_MODEL: &str = "llama3-70b-8192";
pub const DEFAULT_TEMPERATURE: f32 = 0.7;

/// LLM configuration interface for OpenAI-compatible APIs.
pub trait LlmConfig: Send + Sync {
    fn api_key(&self) -> &str;
    fn base_url(&self) -> &str;
    fn model(&self) -> &str;
    fn temperature(&self) -> f32;
}

/// LLM config loaded from environment variables.
#[derive(Debug, Clone, PartialEq)]
pub struct EnvLlmConfig {
    pub groq_api_key: String,
    pub llm_base_url: String,
    pub llm_model: String,
    pub llm_temperature: f32,
}

impl LlmConfig for EnvLlmConfig {
    fn api_key(&self) -> &str {
        &self.groq_api_key
    }
    fn base_url(&self) -> &str {
        &self.llm_base_url
    }
    fn model(&self) -> &str {
        &self.llm_model
    }
    fn temperature(&self) -> f32 {
        self.llm_temperature
    }
}

impl EnvLlmConfig {
    /// Load from environment variables.
    ///
    /// `GROQ_API_KEY` is required; a missing or blank key is [`QuoteBotError::MissingCredential`].
    pub fn from_env() -> Result<Self> {
        let groq_api_key = env::var("GROQ_API_KEY")
            .ok()
            .filter(|s| !s.trim().is_empty())
            .ok_or_else(|| QuoteBotError::MissingCredential(GROQ_KEY_INSTRUCTION.to_string()))?;
        let llm_base_url = env::var("LLM_BASE_URL")
            .ok()
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_LLM_BASE_URL.to_string());
        let llm_model = env::var("LLM_MODEL")
            .ok()
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_LLM_MODEL.to_string());
        let llm_temperature = match env::var("LLM_TEMPERATURE")
            .ok()
            .filter(|s| !s.trim().is_empty())
        {
            Some(raw) => raw.trim().parse::<f32>().map_err(|e| {
                QuoteBotError::Config(format!("LLM_TEMPERATURE={:?} is not a number: {}", raw, e))
            })?,
            None => DEFAULT_TEMPERATURE,
        };
        Ok(Self {
            groq_api_key,
            llm_base_url,
            llm_model,
            llm_temperature,
        })
    }
}
