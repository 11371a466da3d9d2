//! One user's conversation. The file on disk is the source of truth; every mutating method
//! persists before returning.

use prompt::{ChatMessage, MessageRole};
use tracing::info;

use crate::error::HistoryError;
use crate::memory_buffer::ChatMemoryBuffer;
use crate::models::HistoryStats;
use crate::store::ChatStore;

#[derive(Debug, Clone)]
pub struct ConversationHistory {
    store: ChatStore,
    user_id: String,
    messages: Vec<ChatMessage>,
}

impl ConversationHistory {
    pub(crate) fn from_parts(store: ChatStore, user_id: &str, messages: Vec<ChatMessage>) -> Self {
        Self {
            store,
            user_id: user_id.to_string(),
            messages,
        }
    }

    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn append(&mut self, message: ChatMessage) -> Result<(), HistoryError> {
        let mut next = self.messages.clone();
        next.push(message);
        self.commit(next)
    }

    /// Appends a user message and its reply, then persists once.
    pub fn append_turn(
        &mut self,
        user_message: impl Into<String>,
        reply: impl Into<String>,
    ) -> Result<(), HistoryError> {
        let mut next = self.messages.clone();
        next.push(ChatMessage::user(user_message));
        next.push(ChatMessage::assistant(reply));
        self.commit(next)
    }

    /// Writes the in-memory messages over the user's file.
    pub fn persist(&self) -> Result<(), HistoryError> {
        self.store.write(&self.user_id, &self.messages)
    }

    /// Writes `next` to disk and adopts it only once the write succeeded, so a failed write
    /// leaves memory matching the file.
    fn commit(&mut self, next: Vec<ChatMessage>) -> Result<(), HistoryError> {
        self.store.write(&self.user_id, &next)?;
        self.messages = next;
        Ok(())
    }

    pub fn clear(&mut self) -> Result<(), HistoryError> {
        self.commit(Vec::new())?;
        info!(user_id = %self.user_id, "chat history cleared");
        Ok(())
    }

    /// Makes `messages` the authoritative history, in memory and on disk.
    pub fn replace(&mut self, messages: Vec<ChatMessage>) -> Result<(), HistoryError> {
        self.commit(messages)?;
        info!(user_id = %self.user_id, messages = self.messages.len(), "chat history replaced");
        Ok(())
    }

    /// Discards the in-memory view and re-reads the file.
    pub fn reload(&mut self) -> Result<(), HistoryError> {
        self.messages = self.store.read(&self.user_id)?;
        Ok(())
    }

    pub fn window(&self, buffer: &ChatMemoryBuffer) -> Vec<ChatMessage> {
        buffer.window(&self.messages)
    }

    pub fn stats(&self) -> HistoryStats {
        let count = |role: MessageRole| self.messages.iter().filter(|m| m.role == role).count();
        HistoryStats {
            total_messages: self.messages.len(),
            user_messages: count(MessageRole::User),
            assistant_messages: count(MessageRole::Assistant),
        }
    }
}
