//! OpenAI-compatible [`LlmClient`] over openai-client.

use anyhow::Result;
use async_trait::async_trait;
use prompt::ChatMessage;
use tracing::instrument;

use super::{chat_message_to_openai, LlmClient, LlmConfig};

/// [`LlmClient`] backed by openai-client (Groq by default).
#[derive(Clone)]
pub struct OpenAILlmClient {
    client: openai_client::OpenAIClient,
    model: String,
    temperature: Option<f32>,
}

impl OpenAILlmClient {
    pub fn with_base_url(api_key: String, base_url: String) -> Self {
        Self {
            client: openai_client::OpenAIClient::with_base_url(api_key, base_url),
            model: super::DEFAULT_LLM_MODEL.to_string(),
            temperature: None,
        }
    }

    /// Builds the client from an [`LlmConfig`] (key, base URL, model, temperature).
    pub fn from_config(config: &dyn LlmConfig) -> Self {
        Self::with_base_url(config.api_key().to_string(), config.base_url().to_string())
            .with_model(config.model().to_string())
            .with_temperature(config.temperature())
    }

    pub fn with_model(mut self, model: String) -> Self {
        self.model = model;
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}

#[async_trait]
impl LlmClient for OpenAILlmClient {
    #[instrument(skip(self, messages), fields(model = %self.model, message_count = messages.len()))]
    async fn get_llm_response_with_messages(&self, messages: Vec<ChatMessage>) -> Result<String> {
        let openai_messages = messages
            .iter()
            .map(chat_message_to_openai)
            .collect::<Result<Vec<_>>>()?;
        self.client
            .chat_completion(&self.model, self.temperature, openai_messages)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::EnvLlmConfig;

    #[test]
    fn from_config_applies_model_and_temperature() {
        let config = EnvLlmConfig {
            groq_api_key: "gsk_test".to_string(),
            llm_base_url: "http://localhost:9/v1".to_string(),
            llm_model: "llama-3.1-8b-instant".to_string(),
            llm_temperature: 0.2,
        };
        let client = OpenAILlmClient::from_config(&config);
        assert_eq!(client.model(), "llama-3.1-8b-instant");
        assert_eq!(client.temperature, Some(0.2));
    }
}
