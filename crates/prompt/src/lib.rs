//! # Prompt
//!
//! Builds the generation request sent to the LLM for one conversation turn.
//!
//! ## Layout
//!
//! 1. **System**: persona instruction (tone, quote-adaptation rules).
//! 2. **History**: the bounded recent window, each message with its own role.
//! 3. **User**: retrieved quotes section + the current message, marked as taking priority
//!    over earlier conversation.
//!
//! ## External interactions
//!
//! - **AI models**: the returned messages are sent to an OpenAI-compatible chat API.

use serde::{Deserialize, Serialize};

mod persona;

pub use persona::{DEFAULT_FALLBACK_REPLY, DEFAULT_GREETING, DEFAULT_PERSONA_PROMPT};

/// Role of a message, one-to-one with OpenAI Chat Completions API `role` values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    System,
    User,
    Assistant,
}

/// A single chat message, one-to-one with one element of the OpenAI `messages` array.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: MessageRole,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::Assistant,
            content: content.into(),
        }
    }
}

/// Section title for retrieved quotes.
pub const SECTION_QUOTES: &str = "Quotes (retrieved):";

/// Shown in place of the quote list when retrieval returned nothing usable.
pub const NO_QUOTES_NOTE: &str =
    "No closely matching quotes were found. Stay in character and say something mysterious.";

/// Section title for the message being answered.
pub const SECTION_CURRENT: &str = "Current message (answer this; it takes priority over the earlier conversation):";

/// Formats one quote as a context line: `"sentence" (character)`.
pub fn format_quote(sentence: &str, character: &str) -> String {
    let character = character.trim();
    if character.is_empty() {
        format!("\"{}\"", sentence.trim())
    } else {
        format!("\"{}\" ({})", sentence.trim(), character)
    }
}

/// Builds the final user message: quotes section followed by the current message.
pub fn format_quote_context<Q, QI>(quote_lines: Q, current_message: &str) -> String
where
    Q: IntoIterator<Item = QI>,
    QI: AsRef<str>,
{
    let mut out = String::new();
    out.push_str(SECTION_QUOTES);
    out.push('\n');
    let mut any = false;
    for line in quote_lines {
        out.push_str("- ");
        out.push_str(line.as_ref());
        out.push('\n');
        any = true;
    }
    if !any {
        out.push_str(NO_QUOTES_NOTE);
        out.push('\n');
    }
    out.push('\n');
    out.push_str(SECTION_CURRENT);
    out.push('\n');
    out.push_str(current_message);
    out
}

/// Assembles the full generation request for one turn.
///
/// Order: optional System(persona) → history (roles preserved, system entries skipped so the
/// persona stays the only instruction) → User(quotes + current message).
pub fn build_reply_messages<Q, QI>(
    persona: Option<&str>,
    quote_lines: Q,
    history: &[ChatMessage],
    current_message: &str,
) -> Vec<ChatMessage>
where
    Q: IntoIterator<Item = QI>,
    QI: AsRef<str>,
{
    let mut messages = Vec::with_capacity(history.len() + 2);

    if let Some(p) = persona.filter(|p| !p.trim().is_empty()) {
        messages.push(ChatMessage::system(p));
    }

    messages.extend(
        history
            .iter()
            .filter(|m| m.role != MessageRole::System)
            .cloned(),
    );

    messages.push(ChatMessage::user(format_quote_context(
        quote_lines,
        current_message,
    )));
    messages
}

/// Normalises a raw model reply: trims whitespace and surrounding double quotes.
pub fn clean_reply(raw: &str) -> String {
    raw.trim().trim_matches('"').trim().to_string()
}
