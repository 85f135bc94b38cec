//! Core traits and types for the retail catalog assistant
//!
//! This crate provides foundational types used across all other crates:
//! - Catalog types (typed products, textual snapshots, scored matches)
//! - Shopping constraints extracted from user text
//! - Conversation history entries
//! - Provider traits for the external collaborators (history, catalog, generator)
//! - Error types

pub mod constraints;
pub mod conversation;
pub mod error;
pub mod product;
pub mod snapshot;
pub mod traits;

pub use constraints::{Category, ExtractedConstraints, Purpose};
pub use conversation::HistoryEntry;
pub use error::{Error, Result};
pub use product::{Product, ScoredProduct};
pub use snapshot::CatalogSnapshot;

pub use traits::{GeneratorError, HistoryProvider, ReplyGenerator, SnapshotProvider};
