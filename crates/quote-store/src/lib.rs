//! # Quote Store
//!
//! Reads the corpus file once at startup. The file is JSON with a top-level `quotes` array whose
//! elements are `{ "sentence": ..., "character": ... }`. The loaded corpus is read-only.

use std::fs;
use std::path::Path;

use quotebot_core::{QuoteBotError, Result};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument, warn};

/// Default corpus path, relative to the working directory.
pub const DEFAULT_QUOTES_PATH: &str = "datas.json";

/// A single quote and the character who said it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Quote {
    pub sentence: String,
    pub character: String,
}

impl Quote {
    pub fn new(sentence: impl Into<String>, character: impl Into<String>) -> Self {
        Self {
            sentence: sentence.into(),
            character: character.into(),
        }
    }
}

#[derive(Deserialize)]
struct QuoteFile {
    quotes: Vec<Quote>,
}

/// Parses corpus JSON. Malformed data or a missing `quotes` key is [`QuoteBotError::DataUnavailable`].
pub fn parse_quotes(json: &str) -> Result<Vec<Quote>> {
    serde_json::from_str::<QuoteFile>(json)
        .map(|file| file.quotes)
        .map_err(|e| QuoteBotError::DataUnavailable(format!("invalid quote data: {}", e)))
}

/// Loads the corpus from `path`.
///
/// Fails with [`QuoteBotError::DataUnavailable`] when the file is missing, unreadable, not valid
/// JSON, or lacks the `quotes` key. An empty `quotes` array loads fine; the index builder rejects it.
#[instrument(skip_all, fields(path = %path.as_ref().display()))]
pub fn load_quotes(path: impl AsRef<Path>) -> Result<Vec<Quote>> {
    let path = path.as_ref();
    let json = fs::read_to_string(path).map_err(|e| {
        warn!(error = %e, "quote file unreadable");
        QuoteBotError::DataUnavailable(format!("cannot read {}: {}", path.display(), e))
    })?;
    let quotes = parse_quotes(&json).map_err(|e| {
        warn!(error = %e, "quote file malformed");
        match e {
            QuoteBotError::DataUnavailable(msg) => {
                QuoteBotError::DataUnavailable(format!("{}: {}", path.display(), msg))
            }
            other => other,
        }
    })?;
    info!(count = quotes.len(), "step: quotes loaded");
    Ok(quotes)
}
