//! Post-validation of generated replies against catalog prices
//!
//! A reply moves through
//! `Received → PriceReconciled → TotalSynced → {Validated | Flagged}`:
//! 1. every "<product name> ... <price>" mention whose price is off by more
//!    than the tolerance is rewritten to the catalog price
//! 2. if the non-total lines quote exactly one distinct amount, the total
//!    line is synced to it
//! 3. any remaining quoted amount that matches no catalog price flags the
//!    reply as a possible fabrication
//!
//! Flagging is a verdict, not an error: what to do with a flagged reply is up
//! to the caller.

use once_cell::sync::Lazy;
use regex::Regex;
use std::ops::Range;

use retail_agent_catalog::CatalogEntry;
use retail_agent_config::ValidatorConfig;
use retail_agent_text_processing::find_currency_amounts;

const PRICE_EPSILON: f64 = 0.005;

static TOTAL_LINE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(?:total|subtotal|jami|umumiy|itogo|итого|всего|общая сумма)\b").unwrap()
});

/// Validation state, used for logging
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationStage {
    Received,
    PriceReconciled,
    TotalSynced,
    Validated,
    Flagged,
}

/// A quoted price replaced with the catalog one
#[derive(Debug, Clone, PartialEq)]
pub struct PriceCorrection {
    pub product: String,
    pub quoted: f64,
    pub corrected: f64,
}

/// Terminal verdict for one reply
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationOutcome {
    Validated {
        reply: String,
        corrections: Vec<PriceCorrection>,
    },
    /// Some quoted amounts are not catalog prices
    Flagged {
        reply: String,
        corrections: Vec<PriceCorrection>,
        suspect_prices: Vec<f64>,
    },
}

impl ValidationOutcome {
    pub fn reply(&self) -> &str {
        match self {
            ValidationOutcome::Validated { reply, .. } | ValidationOutcome::Flagged { reply, .. } => {
                reply
            }
        }
    }

    pub fn into_reply(self) -> String {
        match self {
            ValidationOutcome::Validated { reply, .. } | ValidationOutcome::Flagged { reply, .. } => {
                reply
            }
        }
    }

    pub fn corrections(&self) -> &[PriceCorrection] {
        match self {
            ValidationOutcome::Validated { corrections, .. }
            | ValidationOutcome::Flagged { corrections, .. } => corrections,
        }
    }

    pub fn is_flagged(&self) -> bool {
        matches!(self, ValidationOutcome::Flagged { .. })
    }

    pub fn stage(&self) -> ValidationStage {
        if self.is_flagged() {
            ValidationStage::Flagged
        } else {
            ValidationStage::Validated
        }
    }
}

/// Catalog entry with a compiled, separator-tolerant name pattern
struct NamePattern<'a> {
    entry: &'a CatalogEntry,
    pattern: Regex,
}

impl<'a> NamePattern<'a> {
    /// "Intel i5 13400F" also matches "intel i5-13400f"
    ///
    /// `lowered_reply` screens out names whose words do not all occur in the
    /// reply, so only plausible mentions get a compiled pattern.
    fn new(entry: &'a CatalogEntry, lowered_reply: &str) -> Option<Self> {
        let parts: Vec<&str> = entry
            .name
            .split(|c: char| c.is_whitespace() || matches!(c, '-' | '_' | '/'))
            .filter(|p| !p.is_empty())
            .collect();
        if parts.is_empty()
            || !parts
                .iter()
                .all(|part| lowered_reply.contains(&part.to_lowercase()))
        {
            return None;
        }
        let escaped: Vec<String> = parts.iter().map(|p| regex::escape(p)).collect();
        let pattern = Regex::new(&format!(r"(?i){}", escaped.join(r"[\s\-_/]*"))).ok()?;
        Some(Self { entry, pattern })
    }
}

/// Patterns for the catalog lines the reply can possibly mention, longest
/// name first so "RTX 4060 Ti" is not claimed by "RTX 4060"
fn candidate_patterns<'a>(reply: &str, catalog: &'a [CatalogEntry]) -> Vec<NamePattern<'a>> {
    let lowered = reply.to_lowercase();
    let mut patterns: Vec<NamePattern<'a>> = catalog
        .iter()
        .filter_map(|entry| NamePattern::new(entry, &lowered))
        .collect();
    patterns.sort_by(|a, b| b.entry.name.len().cmp(&a.entry.name.len()));
    patterns
}

/// Rule-based reply validator
#[derive(Debug, Clone, Default)]
pub struct ResponseValidator {
    config: ValidatorConfig,
}

impl ResponseValidator {
    pub fn new(config: ValidatorConfig) -> Self {
        Self { config }
    }

    fn tolerance(&self, price: f64) -> f64 {
        self.config
            .absolute_tolerance
            .max(self.config.relative_tolerance * price)
    }

    /// Validate `reply` against the catalog lines the generator was shown
    pub fn validate(&self, reply: &str, catalog: &[CatalogEntry]) -> ValidationOutcome {
        tracing::trace!(stage = ?ValidationStage::Received, chars = reply.len());

        let (reconciled, corrections) = self.reconcile_prices(reply, catalog);
        tracing::debug!(
            stage = ?ValidationStage::PriceReconciled,
            corrections = corrections.len()
        );

        let synced = sync_total(&reconciled);
        tracing::debug!(stage = ?ValidationStage::TotalSynced, changed = synced != reconciled);

        let suspect_prices = untraceable_prices(&synced, catalog);
        if suspect_prices.is_empty() {
            ValidationOutcome::Validated {
                reply: synced,
                corrections,
            }
        } else {
            tracing::warn!(suspect = ?suspect_prices, "Reply quotes prices missing from the catalog");
            ValidationOutcome::Flagged {
                reply: synced,
                corrections,
                suspect_prices,
            }
        }
    }

    fn reconcile_prices(
        &self,
        reply: &str,
        catalog: &[CatalogEntry],
    ) -> (String, Vec<PriceCorrection>) {
        let patterns = candidate_patterns(reply, catalog);

        let mut corrections = Vec::new();
        let lines: Vec<String> = reply
            .split('\n')
            .map(|line| {
                if TOTAL_LINE.is_match(line) {
                    return line.to_string();
                }
                self.reconcile_line(line, &patterns, &mut corrections)
            })
            .collect();

        (lines.join("\n"), corrections)
    }

    fn reconcile_line(
        &self,
        line: &str,
        patterns: &[NamePattern<'_>],
        corrections: &mut Vec<PriceCorrection>,
    ) -> String {
        let mut mentions: Vec<(Range<usize>, &CatalogEntry)> = Vec::new();
        for name in patterns {
            for found in name.pattern.find_iter(line) {
                let range = found.range();
                let overlaps = mentions
                    .iter()
                    .any(|(taken, _)| range.start < taken.end && taken.start < range.end);
                if !overlaps {
                    mentions.push((range, name.entry));
                }
            }
        }
        if mentions.is_empty() {
            return line.to_string();
        }
        mentions.sort_by_key(|(range, _)| range.start);

        let amounts = find_currency_amounts(line);
        let mut replacements: Vec<(Range<usize>, String)> = Vec::new();

        for (i, (range, entry)) in mentions.iter().enumerate() {
            let limit = mentions.get(i + 1).map_or(line.len(), |(next, _)| next.start);
            let Some(amount) = amounts
                .iter()
                .find(|a| a.span.start >= range.end && a.span.start < limit)
            else {
                continue;
            };

            if (amount.value - entry.price).abs() > self.tolerance(entry.price) {
                tracing::debug!(
                    product = %entry.name,
                    quoted = amount.value,
                    catalog = entry.price,
                    "Correcting quoted price"
                );
                corrections.push(PriceCorrection {
                    product: entry.name.clone(),
                    quoted: amount.value,
                    corrected: entry.price,
                });
                replacements.push((amount.number.clone(), format!("{:.2}", entry.price)));
            }
        }

        apply_replacements(line, replacements)
    }
}

fn apply_replacements(line: &str, mut replacements: Vec<(Range<usize>, String)>) -> String {
    let mut out = line.to_string();
    replacements.sort_by_key(|(range, _)| std::cmp::Reverse(range.start));
    for (range, text) in replacements {
        out.replace_range(range, &text);
    }
    out
}

fn same_price(a: f64, b: f64) -> bool {
    (a - b).abs() < PRICE_EPSILON
}

/// Rewrite the total line when every other quoted amount agrees
fn sync_total(reply: &str) -> String {
    let lines: Vec<&str> = reply.split('\n').collect();
    let Some(total_index) = lines.iter().position(|line| TOTAL_LINE.is_match(line)) else {
        return reply.to_string();
    };

    let mut distinct: Vec<f64> = Vec::new();
    for (i, line) in lines.iter().enumerate() {
        if i == total_index || TOTAL_LINE.is_match(line) {
            continue;
        }
        for amount in find_currency_amounts(line) {
            if !distinct.iter().any(|v| same_price(*v, amount.value)) {
                distinct.push(amount.value);
            }
        }
    }
    let [only] = distinct.as_slice() else {
        return reply.to_string();
    };

    let total_line = lines[total_index];
    let Some(total) = find_currency_amounts(total_line).pop() else {
        return reply.to_string();
    };
    if same_price(total.value, *only) {
        return reply.to_string();
    }

    tracing::debug!(quoted = total.value, synced = *only, "Syncing total line");
    let rewritten = apply_replacements(total_line, vec![(total.number, format!("{:.2}", only))]);
    let mut out: Vec<String> = lines.iter().map(|line| line.to_string()).collect();
    out[total_index] = rewritten;
    out.join("\n")
}

/// Quoted amounts outside total lines that match no catalog price
fn untraceable_prices(reply: &str, catalog: &[CatalogEntry]) -> Vec<f64> {
    let mut suspect: Vec<f64> = Vec::new();
    // a total is a sum of listed prices, not a catalog price, so it cannot be
    // traced to a single line
    for line in reply.split('\n').filter(|line| !TOTAL_LINE.is_match(line)) {
        for amount in find_currency_amounts(line) {
            let known = catalog.iter().any(|e| same_price(e.price, amount.value));
            if !known && !suspect.iter().any(|v| same_price(*v, amount.value)) {
                suspect.push(amount.value);
            }
        }
    }
    suspect
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(name: &str, price: f64) -> CatalogEntry {
        CatalogEntry {
            name: name.to_string(),
            price,
            category: Some("CPU".to_string()),
            line: 0,
        }
    }

    fn catalog() -> Vec<CatalogEntry> {
        vec![
            entry("Intel i5 13400F", 154.0),
            entry("Intel i5 10400F", 100.0),
            entry("RTX 4060", 300.0),
            entry("RTX 4060 Ti", 390.0),
        ]
    }

    #[test]
    fn test_wrong_price_is_rewritten() {
        let validator = ResponseValidator::default();
        let outcome = validator.validate("Intel i5 13400F - 200$ turadi.", &catalog());

        assert!(!outcome.is_flagged());
        assert_eq!(outcome.reply(), "Intel i5 13400F - 154.00$ turadi.");
        assert_eq!(
            outcome.corrections(),
            [PriceCorrection {
                product: "Intel i5 13400F".into(),
                quoted: 200.0,
                corrected: 154.0
            }]
        );
    }

    #[test]
    fn test_small_drift_is_tolerated() {
        let validator = ResponseValidator::default();
        // 8 off is within max(10, 15.4); the amount is then not a catalog price
        let outcome = validator.validate("intel i5-13400f: 162$", &catalog());
        assert!(outcome.corrections().is_empty());
        assert!(outcome.is_flagged());
    }

    #[test]
    fn test_longest_name_claims_mention() {
        let validator = ResponseValidator::default();
        let outcome = validator.validate("RTX 4060 Ti narxi 300$, RTX 4060 esa 300$", &catalog());
        assert_eq!(outcome.reply(), "RTX 4060 Ti narxi 390.00$, RTX 4060 esa 300$");
        assert_eq!(outcome.corrections().len(), 1);
    }

    #[test]
    fn test_total_synced_to_single_amount() {
        let validator = ResponseValidator::default();
        let reply = "Intel i5 13400F - 154$\nJami: 160$";
        let outcome = validator.validate(reply, &catalog());
        assert_eq!(outcome.reply(), "Intel i5 13400F - 154$\nJami: 154.00$");
        assert!(!outcome.is_flagged());
    }

    #[test]
    fn test_total_left_alone_with_several_amounts() {
        let validator = ResponseValidator::default();
        let reply = "Intel i5 13400F - 154$\nRTX 4060 - 300$\nTotal: 454$";
        let outcome = validator.validate(reply, &catalog());
        assert_eq!(outcome.reply(), reply);
        assert!(!outcome.is_flagged());
    }

    #[test]
    fn test_fabricated_price_flags_reply() {
        let validator = ResponseValidator::default();
        let outcome = validator.validate("Sizga AMD Ryzen 7 7800X3D ni 420$ ga tavsiya qilaman", &catalog());
        match outcome {
            ValidationOutcome::Flagged { suspect_prices, .. } => {
                assert_eq!(suspect_prices, vec![420.0]);
            }
            other => panic!("expected flagged, got {:?}", other),
        }
    }

    #[test]
    fn test_reply_without_prices_validates() {
        let validator = ResponseValidator::default();
        let outcome = validator.validate("Qaysi maqsadda ishlatasiz?", &catalog());
        assert_eq!(outcome.stage(), ValidationStage::Validated);
    }

    #[test]
    fn test_only_plausible_names_get_patterns() {
        let mut large: Vec<CatalogEntry> = (0..2000)
            .map(|i| entry(&format!("Cable Model{}", i), 5.0 + i as f64))
            .collect();
        large.extend(catalog());

        let reply = "Intel i5 13400F - 200$ turadi.";
        let patterns = candidate_patterns(reply, &large);
        let names: Vec<&str> = patterns.iter().map(|p| p.entry.name.as_str()).collect();
        assert_eq!(names, ["Intel i5 13400F"]);

        let outcome = ResponseValidator::default().validate(reply, &large);
        assert_eq!(outcome.reply(), "Intel i5 13400F - 154.00$ turadi.");
    }

    #[test]
    fn test_separator_variants_pass_screening() {
        let catalog = catalog();
        let patterns = candidate_patterns("intel i5-13400f va rtx4060 ti", &catalog);
        let names: Vec<&str> = patterns.iter().map(|p| p.entry.name.as_str()).collect();
        assert_eq!(names, ["Intel i5 13400F", "RTX 4060 Ti", "RTX 4060"]);
    }
}
