//! Process-local textual catalog provider

use parking_lot::RwLock;

use retail_agent_core::{CatalogSnapshot, Error, Result, SnapshotProvider};

/// Holds the current snapshot and its label; replaced on ingestion
#[derive(Default)]
pub struct InMemorySnapshotProvider {
    current: RwLock<Option<(CatalogSnapshot, String)>>,
}

impl InMemorySnapshotProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_snapshot(snapshot: CatalogSnapshot, label: impl Into<String>) -> Self {
        let provider = Self::new();
        provider.replace(snapshot, label);
        provider
    }

    pub fn replace(&self, snapshot: CatalogSnapshot, label: impl Into<String>) {
        let label = label.into();
        tracing::info!(label = %label, lines = snapshot.len(), "Catalog snapshot replaced");
        *self.current.write() = Some((snapshot, label));
    }

    pub fn clear(&self) {
        *self.current.write() = None;
    }
}

impl SnapshotProvider for InMemorySnapshotProvider {
    fn text_snapshot(&self) -> Result<(CatalogSnapshot, String)> {
        match self.current.read().as_ref() {
            Some((snapshot, label)) if !snapshot.is_empty() => {
                Ok((snapshot.clone(), label.clone()))
            }
            _ => Err(Error::NotFound("catalog snapshot".to_string())),
        }
    }
}
