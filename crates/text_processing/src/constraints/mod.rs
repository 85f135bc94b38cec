//! Shopping constraint extraction
//!
//! Pulls a budget ceiling, category, brands and purpose out of one utterance.
//! When the utterance says nothing about money and names no concrete model,
//! earlier user turns fill the gaps (see [`ConstraintExtractor::extract_with_history`]).

mod budget;
mod vocabulary;

pub use budget::extract_budget;

use retail_agent_config::ExtractionConfig;
use retail_agent_core::{ExtractedConstraints, HistoryEntry};

use crate::normalize::{is_model_token, NormalizedText};
use vocabulary::{detect_brands, detect_category, detect_purpose, KeywordText};

/// Rule-based constraint extractor
#[derive(Debug, Clone, Default)]
pub struct ConstraintExtractor {
    config: ExtractionConfig,
}

impl ConstraintExtractor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: ExtractionConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ExtractionConfig {
        &self.config
    }

    /// Constraints stated in `text` alone
    pub fn extract(&self, text: &str) -> ExtractedConstraints {
        let normalized = NormalizedText::new(text);
        let keywords = KeywordText::new(&normalized);

        ExtractedConstraints {
            budget: extract_budget(text, self.config.min_budget),
            category: detect_category(&keywords),
            brands: detect_brands(&normalized, &keywords, self.config.max_brands),
            purpose: detect_purpose(&keywords),
        }
    }

    /// Constraints for `text`, completed from earlier user turns
    ///
    /// `history` is ordered oldest first. Carry-over only happens when the
    /// current turn is ambiguous: no budget of its own and no model-number
    /// token. Up to `history_turns` entries are then scanned newest first:
    /// - purpose and category are filled while still missing
    /// - budget and brands are carried only from a turn whose category equals
    ///   the current turn's own category, or from any turn when the current
    ///   turn names none
    /// - the scan stops once budget, purpose and category are all set
    ///
    /// The gating is a heuristic. A budget stated for a different category
    /// is deliberately left behind.
    pub fn extract_with_history(
        &self,
        text: &str,
        history: &[HistoryEntry],
    ) -> ExtractedConstraints {
        let mut constraints = self.extract(text);
        if !self.is_ambiguous(text, &constraints) {
            return constraints;
        }
        let current_category = constraints.category;

        for (turn, entry) in history
            .iter()
            .rev()
            .take(self.config.history_turns)
            .enumerate()
        {
            if constraints.is_saturated() {
                break;
            }

            let past = self.extract(&entry.text);
            let same_topic = current_category.is_none() || past.category == current_category;

            if constraints.purpose.is_none() {
                constraints.purpose = past.purpose;
            }
            if same_topic {
                if constraints.budget.is_none() && past.budget.is_some() {
                    tracing::debug!(turn, budget = ?past.budget, "Budget carried from history");
                    constraints.budget = past.budget;
                }
                if constraints.brands.is_empty() && !past.brands.is_empty() {
                    constraints.brands = past.brands;
                }
            }
            if constraints.category.is_none() {
                constraints.category = past.category;
            }
        }

        tracing::debug!(constraints = %constraints, "Constraints after history fallback");
        constraints
    }

    /// No explicit budget and no model-number-like token
    fn is_ambiguous(&self, text: &str, constraints: &ExtractedConstraints) -> bool {
        constraints.budget.is_none()
            && !NormalizedText::new(text).tokens().any(is_model_token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use retail_agent_core::{Category, Purpose};

    fn history(turns: &[&str]) -> Vec<HistoryEntry> {
        turns.iter().map(|t| HistoryEntry::new(*t, "ok")).collect()
    }

    #[test]
    fn test_extract_single_turn() {
        let extractor = ConstraintExtractor::new();
        let c = extractor.extract("O'yin uchun videokarta kerak, byudjet 500$, MSI yoki Asus");
        assert_eq!(c.budget, Some(500));
        assert_eq!(c.category, Some(Category::Gpu));
        assert_eq!(c.purpose, Some(Purpose::Gaming));
        assert_eq!(c.brands, vec!["asus", "msi"]);
    }

    #[test]
    fn test_scenario_model_number_query() {
        let c = ConstraintExtractor::new().extract("13400f kerak");
        assert_eq!(c.budget, None);
        assert!(c.brands.is_empty());
    }

    #[test]
    fn test_history_fills_missing_fields() {
        let extractor = ConstraintExtractor::new();
        let past = history(&["videokarta kerak", "gaming uchun 800$ atrofida"]);
        let c = extractor.extract_with_history("qaysi biri yaxshi?", &past);
        assert_eq!(c.category, Some(Category::Gpu));
        assert_eq!(c.purpose, Some(Purpose::Gaming));
        assert_eq!(c.budget, Some(800));
    }

    #[test]
    fn test_history_gated_on_current_turn_category() {
        let extractor = ConstraintExtractor::new();
        // current turn names no category, so the older budget still carries
        // even though a newer turn filled the category
        let past = history(&["gaming uchun 800$ atrofida", "videokarta kerak"]);
        let c = extractor.extract_with_history("qaysi biri yaxshi?", &past);
        assert_eq!(c.category, Some(Category::Gpu));
        assert_eq!(c.purpose, Some(Purpose::Gaming));
        assert_eq!(c.budget, Some(800));

        // a current category only accepts budgets stated for that category
        let past = history(&["gaming uchun 800$ atrofida", "protsessor 250$ gacha"]);
        let c = extractor.extract_with_history("monitor ham kerak", &past);
        assert_eq!(c.category, Some(Category::Monitor));
        assert_eq!(c.budget, None);
    }

    #[test]
    fn test_history_budget_gated_by_category() {
        let extractor = ConstraintExtractor::new();
        let past = history(&["monitor 300$ gacha"]);
        let c = extractor.extract_with_history("protsessor kerak", &past);
        assert_eq!(c.category, Some(Category::Cpu));
        assert_eq!(c.budget, None);

        let past = history(&["protsessor 300$ gacha"]);
        let c = extractor.extract_with_history("yana protsessor ko'rsating", &past);
        assert_eq!(c.budget, Some(300));
    }

    #[test]
    fn test_history_skipped_when_turn_is_explicit() {
        let extractor = ConstraintExtractor::new();
        let past = history(&["gaming uchun 800$"]);

        let c = extractor.extract_with_history("13400f kerak", &past);
        assert_eq!(c.budget, None);
        assert_eq!(c.purpose, None);

        let c = extractor.extract_with_history("600$ gacha", &past);
        assert_eq!(c.budget, Some(600));
        assert_eq!(c.purpose, None);
    }

    #[test]
    fn test_history_scan_window_and_order() {
        let extractor = ConstraintExtractor::new();
        let mut turns = vec!["1000$ budget"];
        turns.extend(["salom"; 5]);
        let c = extractor.extract_with_history("nima bor?", &history(&turns));
        assert_eq!(c.budget, None, "budget older than the scan window");

        let past = history(&["400$", "700$"]);
        let c = extractor.extract_with_history("nima bor?", &past);
        assert_eq!(c.budget, Some(700), "newest turn wins");
    }
}
