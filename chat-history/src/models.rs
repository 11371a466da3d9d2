//! On-disk layout and aggregate counts.

use chrono::{DateTime, Utc};
use prompt::ChatMessage;
use serde::{Deserialize, Serialize};

/// Content of one user's history file. Rewritten in full on every persist.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryFile {
    pub user_id: String,
    pub updated_at: DateTime<Utc>,
    pub messages: Vec<ChatMessage>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryStats {
    pub total_messages: usize,
    pub user_messages: usize,
    pub assistant_messages: usize,
}
