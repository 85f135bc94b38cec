//! Shop assistant orchestration
//!
//! Ties the catalog engine to an external reply generator:
//! - [`ShopAssistant`] runs one user message end to end
//! - [`ResponseValidator`] reconciles generated prices with the catalog
//! - [`PromptBuilder`] and [`ResponseTemplates`] produce generator input and
//!   generator-free fallback replies
//! - [`InMemoryHistory`] and [`InMemorySnapshotProvider`] are process-local
//!   providers for tests and single-node deployments

pub mod assistant;
pub mod history;
pub mod prompt;
pub mod snapshot;
pub mod telemetry;
pub mod templates;
pub mod validator;

pub use assistant::{AssistantReply, ReplyKind, ShopAssistant};
pub use history::InMemoryHistory;
pub use prompt::PromptBuilder;
pub use snapshot::InMemorySnapshotProvider;
pub use telemetry::init_tracing;
pub use templates::ResponseTemplates;
pub use validator::{PriceCorrection, ResponseValidator, ValidationOutcome, ValidationStage};
