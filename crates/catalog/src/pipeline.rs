//! Filter pipeline driver
//!
//! Order of work for one request:
//! 1. over-budget guard on the unfiltered catalog
//! 2. category inference from mentioned lines when no keyword named one
//! 3. budget/category filtering, widening budget+category to budget-only
//!    when nothing fits
//! 4. brand filtering, dropped again if it would empty the view

use retail_agent_config::FilterConfig;
use retail_agent_core::{CatalogSnapshot, Category, ExtractedConstraints};

use crate::filter::{by_brand, by_budget, by_budget_and_category, by_category, header_category};
use crate::guard::{check_over_budget, BudgetExceeded};
use crate::mention::mentioned_entries;
use crate::snapshot::{CatalogEntry, ParsedSnapshot};

/// A filter applied to produce a view
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterStage {
    Budget,
    Category,
    BudgetAndCategory,
    Brand,
}

/// What the generator gets to see
#[derive(Debug, Clone, PartialEq)]
pub enum CatalogView {
    /// The user named a product above their budget; skip generation
    BudgetExceeded(BudgetExceeded),
    Filtered {
        catalog: CatalogSnapshot,
        entries: Vec<CatalogEntry>,
        stages: Vec<FilterStage>,
        /// A stricter stage came back empty and was relaxed
        widened: bool,
    },
    /// Nothing in the catalog fits
    Empty { stages: Vec<FilterStage> },
}

/// Effective constraints plus the resulting view
#[derive(Debug, Clone, PartialEq)]
pub struct PreparedCatalog {
    /// Input constraints, with an inferred category filled in
    pub constraints: ExtractedConstraints,
    pub view: CatalogView,
}

/// Applies extracted constraints to a textual snapshot
#[derive(Debug, Clone, Default)]
pub struct FilterPipeline {
    config: FilterConfig,
}

impl FilterPipeline {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: FilterConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &FilterConfig {
        &self.config
    }

    pub fn prepare(
        &self,
        snapshot: &CatalogSnapshot,
        constraints: &ExtractedConstraints,
        text: &str,
    ) -> PreparedCatalog {
        let parsed = ParsedSnapshot::parse(snapshot);
        let mut constraints = constraints.clone();

        if let Some(ceiling) = constraints.budget {
            if let Some(exceeded) =
                check_over_budget(&parsed, text, ceiling, self.config.alternatives_count)
            {
                return PreparedCatalog {
                    constraints,
                    view: CatalogView::BudgetExceeded(exceeded),
                };
            }
        }

        if constraints.category.is_none() {
            constraints.category = infer_category(&parsed, text);
        }

        let mut stages = Vec::new();
        let mut widened = false;
        let mut catalog = match (constraints.budget, constraints.category) {
            (Some(ceiling), Some(category)) => {
                let narrowed = by_budget_and_category(snapshot, ceiling, category);
                if narrowed.is_empty() {
                    tracing::debug!(ceiling, category = %category, "Nothing in budget for category, widening");
                    widened = true;
                    stages.push(FilterStage::Budget);
                    by_budget(snapshot, ceiling)
                } else {
                    stages.push(FilterStage::BudgetAndCategory);
                    narrowed
                }
            }
            (Some(ceiling), None) => {
                stages.push(FilterStage::Budget);
                by_budget(snapshot, ceiling)
            }
            (None, Some(category)) => {
                stages.push(FilterStage::Category);
                by_category(snapshot, category)
            }
            (None, None) => snapshot.clone(),
        };

        if !constraints.brands.is_empty() {
            let branded = by_brand(&catalog, &constraints.brands);
            if has_entries(&branded) {
                stages.push(FilterStage::Brand);
                catalog = branded;
            } else {
                tracing::debug!(brands = ?constraints.brands, "Brand filter emptied the view, dropping it");
                widened = true;
            }
        }

        let entries: Vec<CatalogEntry> = ParsedSnapshot::parse(&catalog).entries().cloned().collect();
        tracing::debug!(
            constraints = %constraints,
            stages = ?stages,
            widened,
            lines = entries.len(),
            "Catalog prepared"
        );

        let view = if entries.is_empty() {
            CatalogView::Empty { stages }
        } else {
            CatalogView::Filtered {
                catalog,
                entries,
                stages,
                widened,
            }
        };
        PreparedCatalog { constraints, view }
    }
}

fn has_entries(snapshot: &CatalogSnapshot) -> bool {
    ParsedSnapshot::parse(snapshot).entries().next().is_some()
}

/// Category shared by every line the user text mentions
pub fn infer_category(parsed: &ParsedSnapshot, text: &str) -> Option<Category> {
    let mentioned = mentioned_entries(parsed.entries(), text);
    let mut categories = mentioned
        .iter()
        .map(|entry| entry.category.as_deref().and_then(header_category));

    let first = categories.next()??;
    categories
        .all(|category| category == Some(first))
        .then_some(first)
}
