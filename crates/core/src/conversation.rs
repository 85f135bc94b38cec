//! Conversation history entries

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One past exchange with a user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    /// What the user wrote
    pub text: String,
    /// What the assistant answered
    pub response: String,
    pub timestamp: DateTime<Utc>,
}

impl HistoryEntry {
    pub fn new(text: impl Into<String>, response: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            response: response.into(),
            timestamp: Utc::now(),
        }
    }

    pub fn at(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = timestamp;
        self
    }
}
