//! Provider traits for the collaborators around the catalog engine
//!
//! ```text
//! HistoryProvider:   per-user ordered (text, response, timestamp) turns
//! SnapshotProvider:  textual catalog snapshot with a label, or NotFound
//! ReplyGenerator:    opaque prompt + history -> reply text
//! ```
//!
//! All are object safe so the orchestrator can hold them as `Arc<dyn _>`
//! and tests can swap in scripted mocks.

mod catalog;
mod generator;
mod history;

pub use catalog::SnapshotProvider;
pub use generator::{GeneratorError, ReplyGenerator};
pub use history::HistoryProvider;
