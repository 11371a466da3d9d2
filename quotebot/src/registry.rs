//! One [`QuoteEngine`] per user identifier, created on first use.

use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::sync::Arc;

use chat_history::ChatStore;
use llm_client::LlmClient;
use quote_index::QuoteIndex;
use quotebot_core::Result;
use tracing::info;

use crate::components::QuoteBotComponents;
use crate::config::EngineConfig;
use crate::engine::QuoteEngine;

pub struct EngineRegistry {
    index: Arc<QuoteIndex>,
    llm: Arc<dyn LlmClient>,
    store: ChatStore,
    config: Arc<EngineConfig>,
    engines: HashMap<String, QuoteEngine>,
}

impl EngineRegistry {
    pub fn new(components: QuoteBotComponents, config: EngineConfig) -> Self {
        Self::from_parts(components.index, components.llm, components.store, config)
    }

    pub fn from_parts(
        index: Arc<QuoteIndex>,
        llm: Arc<dyn LlmClient>,
        store: ChatStore,
        config: EngineConfig,
    ) -> Self {
        Self {
            index,
            llm,
            store,
            config: Arc::new(config),
            engines: HashMap::new(),
        }
    }

    /// Returns the user's engine, loading their history from disk the first time.
    pub fn engine_for(&mut self, user_id: &str) -> Result<&mut QuoteEngine> {
        match self.engines.entry(user_id.to_string()) {
            Entry::Occupied(entry) => Ok(entry.into_mut()),
            Entry::Vacant(entry) => {
                let history = self.store.open(user_id)?;
                info!(user_id, messages = history.len(), "Chat engine created");
                Ok(entry.insert(QuoteEngine::new(
                    self.index.clone(),
                    self.llm.clone(),
                    history,
                    self.config.clone(),
                )))
            }
        }
    }

    /// Errors only when the user's history cannot be loaded.
    pub async fn get_reply(&mut self, user_id: &str, user_message: &str) -> Result<String> {
        Ok(self.engine_for(user_id)?.get_reply(user_message).await)
    }

    pub fn len(&self) -> usize {
        self.engines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.engines.is_empty()
    }
}
