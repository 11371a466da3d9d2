//! File-per-user chat store.
//!
//! Each user identifier maps to exactly one file, `{encoded}.json`, inside the store directory.
//! Writes replace the whole file through a temp file and rename.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use chrono::Utc;
use prompt::ChatMessage;
use quotebot_core::write_json_atomic;
use tracing::{debug, instrument};

use crate::conversation::ConversationHistory;
use crate::error::HistoryError;
use crate::models::HistoryFile;

/// Default store directory, relative to the working directory.
pub const DEFAULT_CHAT_STORE_DIR: &str = "chat_history";

/// Maps a user identifier to a file stem. ASCII letters, digits and `-` pass through; every other
/// byte becomes `_xx` (lowercase hex), so distinct identifiers never share a file. The empty
/// identifier maps to `_`.
pub fn encode_user_id(user_id: &str) -> String {
    if user_id.is_empty() {
        return "_".to_string();
    }
    let mut out = String::with_capacity(user_id.len());
    for b in user_id.bytes() {
        if b.is_ascii_alphanumeric() || b == b'-' {
            out.push(b as char);
        } else {
            out.push_str(&format!("_{:02x}", b));
        }
    }
    out
}

/// Parses a JSON array of `{role, content}` messages, e.g. an exported chat view.
pub fn parse_messages(json: &str) -> Result<Vec<ChatMessage>, HistoryError> {
    serde_json::from_str(json).map_err(|e| HistoryError::Deserialization(e.to_string()))
}

#[derive(Debug, Clone)]
pub struct ChatStore {
    dir: PathBuf,
}

impl ChatStore {
    /// The directory is created on first write.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path_for(&self, user_id: &str) -> PathBuf {
        self.dir.join(format!("{}.json", encode_user_id(user_id)))
    }

    /// Reads the persisted messages. A missing file is an empty history; a malformed one is an error.
    #[instrument(skip(self))]
    pub fn read(&self, user_id: &str) -> Result<Vec<ChatMessage>, HistoryError> {
        let path = self.path_for(user_id);
        let raw = match fs::read_to_string(&path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!("no history file yet");
                return Ok(Vec::new());
            }
            Err(e) => return Err(HistoryError::Io(e)),
        };
        let file: HistoryFile = serde_json::from_str(&raw).map_err(|e| {
            HistoryError::Deserialization(format!("{}: {}", path.display(), e))
        })?;
        debug!(messages = file.messages.len(), "history file read");
        Ok(file.messages)
    }

    /// Replaces the user's file with `messages`.
    #[instrument(skip(self, messages), fields(messages = messages.len()))]
    pub fn write(&self, user_id: &str, messages: &[ChatMessage]) -> Result<(), HistoryError> {
        let file = HistoryFile {
            user_id: user_id.to_string(),
            updated_at: Utc::now(),
            messages: messages.to_vec(),
        };
        write_json_atomic(&self.path_for(user_id), &file).map_err(|e| {
            if e.kind() == io::ErrorKind::InvalidData {
                HistoryError::Serialization(e.to_string())
            } else {
                HistoryError::Io(e)
            }
        })?;
        debug!("history file written");
        Ok(())
    }

    /// Loads the user's history from disk.
    pub fn open(&self, user_id: &str) -> Result<ConversationHistory, HistoryError> {
        let messages = self.read(user_id)?;
        Ok(ConversationHistory::from_parts(self.clone(), user_id, messages))
    }
}
