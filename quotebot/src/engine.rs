//! Reply orchestrator for one user.

use std::sync::Arc;

use chat_history::{ChatMemoryBuffer, ConversationHistory, HistoryStats};
use llm_client::LlmClient;
use prompt::{build_reply_messages, clean_reply, format_quote, ChatMessage, DEFAULT_GREETING};
use quote_index::QuoteIndex;
use quotebot_core::{QuoteBotError, Result};
use tracing::{error, info, instrument, warn};

use crate::config::EngineConfig;

/// Couples the shared index and LLM with one user's conversation.
pub struct QuoteEngine {
    index: Arc<QuoteIndex>,
    llm: Arc<dyn LlmClient>,
    history: ConversationHistory,
    memory: ChatMemoryBuffer,
    config: Arc<EngineConfig>,
}

impl QuoteEngine {
    pub fn new(
        index: Arc<QuoteIndex>,
        llm: Arc<dyn LlmClient>,
        history: ConversationHistory,
        config: Arc<EngineConfig>,
    ) -> Self {
        let memory = ChatMemoryBuffer::new(config.token_limit);
        Self {
            index,
            llm,
            history,
            memory,
            config,
        }
    }

    pub fn user_id(&self) -> &str {
        self.history.user_id()
    }

    /// Retrieves quotes, assembles the request and calls the LLM. History is not modified.
    ///
    /// Retrieval, LLM and empty-reply failures are all [`QuoteBotError::GenerationFailure`].
    #[instrument(skip(self, user_message), fields(user_id = %self.user_id(), message_len = user_message.len()))]
    pub async fn generate_reply(&self, user_message: &str) -> Result<String> {
        let retrieved = self
            .index
            .retrieve(user_message, self.config.top_k)
            .await
            .map_err(|e| QuoteBotError::GenerationFailure(format!("retrieval failed: {}", e)))?;
        let top_score = retrieved.first().map(|h| h.score).unwrap_or(0.0);
        let retrieved_count = retrieved.len();
        let hits: Vec<_> = retrieved
            .into_iter()
            .filter(|h| h.score >= self.config.min_score)
            .collect();

        info!(
            retrieved = retrieved_count,
            hits = hits.len(),
            top_score,
            min_score = self.config.min_score,
            "step: quotes retrieved"
        );

        let quote_lines: Vec<String> = hits
            .iter()
            .map(|h| format_quote(&h.quote.sentence, &h.quote.character))
            .collect();
        let window = self.history.window(&self.memory);
        let messages = build_reply_messages(
            Some(self.config.persona_prompt.as_str()),
            &quote_lines,
            &window,
            user_message,
        );

        info!(
            history_window = window.len(),
            request_messages = messages.len(),
            "step: reply request built"
        );

        let raw = self
            .llm
            .get_llm_response_with_messages(messages)
            .await
            .map_err(|e| QuoteBotError::GenerationFailure(format!("LLM call failed: {}", e)))?;

        let reply = clean_reply(&raw);
        if reply.is_empty() {
            return Err(QuoteBotError::GenerationFailure(
                "LLM returned an empty reply".to_string(),
            ));
        }
        Ok(reply)
    }

    /// Answers `user_message`, never failing: a generation error yields the fallback reply and
    /// leaves history untouched. A successful turn is appended and persisted before returning.
    pub async fn get_reply(&mut self, user_message: &str) -> String {
        match self.generate_reply(user_message).await {
            Ok(reply) => {
                if let Err(e) = self.history.append_turn(user_message, reply.clone()) {
                    error!(user_id = %self.user_id(), error = %e, "Failed to persist chat turn");
                }
                reply
            }
            Err(e) => {
                warn!(user_id = %self.user_id(), error = %e, "Reply generation failed, using fallback");
                self.config.fallback_reply.clone()
            }
        }
    }

    pub fn chat_history(&self) -> &[ChatMessage] {
        self.history.messages()
    }

    pub fn clear_chat_history(&mut self) -> Result<()> {
        Ok(self.history.clear()?)
    }

    /// Makes an external view of the conversation authoritative.
    pub fn replace_chat_history(&mut self, messages: Vec<ChatMessage>) -> Result<()> {
        Ok(self.history.replace(messages)?)
    }

    pub fn stats(&self) -> HistoryStats {
        self.history.stats()
    }

    /// Opening line for a user with no history yet.
    pub fn greeting(&self) -> Option<&'static str> {
        self.history.is_empty().then_some(DEFAULT_GREETING)
    }
}
