use crate::{HistoryEntry, Result};

/// Read-only access to a user's conversation history
pub trait HistoryProvider: Send + Sync {
    /// Up to `limit` most recent entries, ordered oldest first
    ///
    /// May return fewer than `limit`. An unknown user yields an empty list
    /// or `Error::NotFound`; callers treat both as "no history".
    fn get_history(&self, user_id: &str, limit: usize) -> Result<Vec<HistoryEntry>>;
}
