//! Process-local conversation history
//!
//! Bounded per-user deques behind one reader/writer lock. Reads clone the
//! requested slice so callers never hold the lock.

use parking_lot::RwLock;
use std::collections::{HashMap, VecDeque};

use retail_agent_config::HistoryConfig;
use retail_agent_core::{Error, HistoryEntry, HistoryProvider, Result};

pub struct InMemoryHistory {
    entries: RwLock<HashMap<String, VecDeque<HistoryEntry>>>,
    max_entries_per_user: usize,
}

impl InMemoryHistory {
    pub fn new(config: &HistoryConfig) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            max_entries_per_user: config.max_entries_per_user.max(1),
        }
    }

    /// Append one exchange, evicting the oldest past the per-user cap
    pub fn record(&self, user_id: &str, text: impl Into<String>, response: impl Into<String>) {
        self.push(user_id, HistoryEntry::new(text, response));
    }

    pub fn push(&self, user_id: &str, entry: HistoryEntry) {
        let mut entries = self.entries.write();
        let turns = entries.entry(user_id.to_string()).or_default();
        turns.push_back(entry);
        while turns.len() > self.max_entries_per_user {
            turns.pop_front();
        }
    }

    pub fn clear(&self, user_id: &str) {
        self.entries.write().remove(user_id);
    }

    pub fn user_count(&self) -> usize {
        self.entries.read().len()
    }
}

impl Default for InMemoryHistory {
    fn default() -> Self {
        Self::new(&HistoryConfig::default())
    }
}

impl HistoryProvider for InMemoryHistory {
    fn get_history(&self, user_id: &str, limit: usize) -> Result<Vec<HistoryEntry>> {
        let entries = self.entries.read();
        let turns = entries
            .get(user_id)
            .ok_or_else(|| Error::NotFound(format!("history for {}", user_id)))?;
        let skip = turns.len().saturating_sub(limit);
        Ok(turns.iter().skip(skip).cloned().collect())
    }
}
