//! Generator-free replies
//!
//! Used when generation is skipped (budget exceeded, nothing to show) or its
//! output cannot be trusted. Prices are printed with two decimals, the same
//! way the validator rewrites them.

use retail_agent_catalog::{representative, top_by_price, BudgetExceeded, CatalogEntry};
use retail_agent_config::FilterConfig;
use retail_agent_core::{ExtractedConstraints, ScoredProduct};

/// Quick response templates
pub struct ResponseTemplates;

impl ResponseTemplates {
    fn bullet(name: &str, price: f64) -> String {
        format!("- {} - {:.2}$", name, price)
    }

    fn listing(heading: &str, entries: &[CatalogEntry]) -> String {
        let mut lines = vec![heading.to_string()];
        lines.extend(entries.iter().map(|e| Self::bullet(&e.name, e.price)));
        lines.join("\n")
    }

    /// The user asked for a product above their budget
    pub fn budget_exceeded(exceeded: &BudgetExceeded) -> String {
        let notice = format!(
            "{} narxi {:.2}$, bu sizning {}$ byudjetingizdan yuqori.",
            exceeded.requested.name, exceeded.requested.price, exceeded.ceiling
        );
        if exceeded.alternatives.is_empty() {
            return format!(
                "{}\nAfsuski, shu turkumda byudjetga mos variant topilmadi.",
                notice
            );
        }
        format!(
            "{}\n{}",
            notice,
            Self::listing("Byudjetingizga mos variantlar:", &exceeded.alternatives)
        )
    }

    /// Nothing in the catalog fits the request
    pub fn no_match() -> String {
        "Afsuski, so'rovingizga mos mahsulot topilmadi. Boshqa model yoki byudjetni ko'rib chiqamizmi?"
            .to_string()
    }

    /// No catalog of any kind is loaded
    pub fn no_catalog() -> String {
        "Hozircha katalog yuklanmagan. Iltimos, birozdan keyin qayta urinib ko'ring.".to_string()
    }

    /// Safe listing built from the filtered catalog
    ///
    /// With a budget the most expensive in-budget lines are shown; without
    /// one, lines spread across the price range.
    pub fn safe_listing(
        entries: &[CatalogEntry],
        constraints: &ExtractedConstraints,
        config: &FilterConfig,
    ) -> String {
        if entries.is_empty() {
            return Self::no_match();
        }
        match constraints.budget {
            Some(budget) => Self::listing(
                &format!("{}$ byudjet doirasidagi eng yaxshi variantlar:", budget),
                &top_by_price(entries, config.top_count),
            ),
            None => Self::listing(
                "Turli narxlardagi variantlar:",
                &representative(entries, config.representative_count),
            ),
        }
    }

    /// Listing of typed search hits, best match first
    pub fn ranked_listing(results: &[ScoredProduct]) -> String {
        if results.is_empty() {
            return Self::no_match();
        }
        let mut lines = vec!["Topilgan mahsulotlar:".to_string()];
        lines.extend(
            results
                .iter()
                .map(|r| Self::bullet(&r.product.name, r.product.price)),
        );
        lines.join("\n")
    }
}
