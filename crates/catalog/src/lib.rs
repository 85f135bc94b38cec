//! Catalog retrieval for the retail assistant
//!
//! Two views of the same shop inventory are served from here:
//! - **Typed store**: [`CatalogStore`] keeps products behind one reader/writer
//!   lock with precomputed match keys, and ranks them with a fuzzy,
//!   multi-signal scorer ([`ranking`])
//! - **Textual snapshot**: category-sectioned "name, price" lines parsed by
//!   [`snapshot`], narrowed by pure [`filter`] stages and driven end to end by
//!   [`FilterPipeline`], including the over-budget [`guard`]

pub mod filter;
pub mod guard;
pub mod mention;
pub mod pipeline;
pub mod ranking;
pub mod select;
pub mod snapshot;
pub mod store;

pub use filter::{by_brand, by_budget, by_budget_and_category, by_category, header_category};
pub use guard::{check_over_budget, BudgetExceeded};
pub use mention::{mentioned_entries, MentionQuery};
pub use pipeline::{infer_category, CatalogView, FilterPipeline, FilterStage, PreparedCatalog};
pub use ranking::{rank, IndexedProduct};
pub use select::{representative, top_by_price};
pub use snapshot::{parse_line, CatalogEntry, ParsedSnapshot, SnapshotLine};
pub use store::CatalogStore;

use thiserror::Error;

/// Catalog errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CatalogError {
    #[error("Invalid product {id}: {reason}")]
    InvalidProduct { id: String, reason: String },

    #[error("Not found: {0}")]
    NotFound(String),
}

impl From<CatalogError> for retail_agent_core::Error {
    fn from(err: CatalogError) -> Self {
        match err {
            CatalogError::NotFound(what) => retail_agent_core::Error::NotFound(what),
            other => retail_agent_core::Error::Catalog(other.to_string()),
        }
    }
}
