//! Token-bounded window over the conversation.
//!
//! The window is the newest run of messages whose estimated token total fits the limit. It never
//! starts with an assistant message, so the model always sees the user turn a reply answered.

use prompt::{ChatMessage, MessageRole};

/// Default context-window budget in estimated tokens.
pub const DEFAULT_TOKEN_LIMIT: usize = 3900;

/// Rough token count: one token per four bytes, rounded up, at least 1.
pub fn estimate_tokens(text: &str) -> usize {
    text.len().div_ceil(4).max(1)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChatMemoryBuffer {
    token_limit: usize,
}

impl Default for ChatMemoryBuffer {
    fn default() -> Self {
        Self::new(DEFAULT_TOKEN_LIMIT)
    }
}

impl ChatMemoryBuffer {
    pub fn new(token_limit: usize) -> Self {
        Self { token_limit }
    }

    pub fn token_limit(&self) -> usize {
        self.token_limit
    }

    /// Returns the most recent messages that fit the budget, oldest first.
    pub fn window(&self, messages: &[ChatMessage]) -> Vec<ChatMessage> {
        let mut used = 0usize;
        let mut start = messages.len();

        for (i, message) in messages.iter().enumerate().rev() {
            let cost = estimate_tokens(&message.content);
            if used + cost > self.token_limit {
                break;
            }
            used += cost;
            start = i;
        }

        while start < messages.len() && messages[start].role == MessageRole::Assistant {
            start += 1;
        }

        messages[start..].to_vec()
    }
}
