//! Over-budget guard
//!
//! Runs on the unfiltered catalog before any filter result is trusted. If the
//! user names a concrete product that costs more than their ceiling, the
//! request short-circuits with that product and the closest in-budget
//! alternatives from the same section.

use crate::filter::header_category;
use crate::mention::{name_tokens, MentionQuery};
use crate::snapshot::{CatalogEntry, ParsedSnapshot};

/// A named product that does not fit the budget
#[derive(Debug, Clone, PartialEq)]
pub struct BudgetExceeded {
    pub requested: CatalogEntry,
    pub ceiling: u64,
    /// Same-section entries within the ceiling, closest price first
    pub alternatives: Vec<CatalogEntry>,
}

fn same_section(a: &CatalogEntry, b: &CatalogEntry) -> bool {
    match (a.category.as_deref(), b.category.as_deref()) {
        (Some(x), Some(y)) => {
            x == y || header_category(x).is_some_and(|c| header_category(y) == Some(c))
        }
        (None, None) => true,
        _ => false,
    }
}

/// Check whether `user_text` names a product priced above `ceiling`
pub fn check_over_budget(
    parsed: &ParsedSnapshot,
    user_text: &str,
    ceiling: u64,
    max_alternatives: usize,
) -> Option<BudgetExceeded> {
    let query = MentionQuery::new(user_text);
    if query.is_empty() {
        return None;
    }

    // in-budget lines the user named word for word outrank looser siblings
    let named_in_budget: Vec<_> = parsed
        .entries()
        .filter(|entry| entry.price <= ceiling as f64 && query.names_exactly(&entry.name))
        .map(|entry| name_tokens(&entry.name))
        .collect();

    let requested = parsed
        .entries()
        .find(|entry| {
            if entry.price <= ceiling as f64 || !query.mentions(&entry.name) {
                return false;
            }
            if query.names_exactly(&entry.name) {
                return true;
            }
            let tokens = name_tokens(&entry.name);
            !named_in_budget.iter().any(|named| named.is_subset(&tokens))
        })?
        .clone();

    let mut alternatives: Vec<CatalogEntry> = parsed
        .entries()
        .filter(|entry| entry.price <= ceiling as f64 && same_section(entry, &requested))
        .cloned()
        .collect();
    alternatives.sort_by(|a, b| b.price.total_cmp(&a.price).then_with(|| a.name.cmp(&b.name)));
    alternatives.truncate(max_alternatives);

    tracing::debug!(
        product = %requested.name,
        price = requested.price,
        ceiling,
        alternatives = alternatives.len(),
        "Requested product exceeds budget"
    );

    Some(BudgetExceeded {
        requested,
        ceiling,
        alternatives,
    })
}
