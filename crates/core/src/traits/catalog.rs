use crate::{CatalogSnapshot, Result};

/// Source of the textual catalog snapshot
pub trait SnapshotProvider: Send + Sync {
    /// Current snapshot and its label (e.g. the ingested file name)
    ///
    /// Returns `Error::NotFound` when nothing has been ingested yet.
    fn text_snapshot(&self) -> Result<(CatalogSnapshot, String)>;
}
