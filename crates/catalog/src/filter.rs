//! Pure filters over a textual catalog snapshot
//!
//! Every filter takes a snapshot and returns a new one made of the original
//! line texts; the input is never touched. Malformed lines do not survive a
//! filter, and a header is only kept while it still has product lines.

use retail_agent_core::{CatalogSnapshot, Category};
use retail_agent_text_processing::normalize;

use crate::snapshot::{CatalogEntry, ParsedSnapshot, SnapshotLine};

/// Category a header text belongs to
///
/// Aliases must start at a word boundary; the longest matching alias wins so
/// "Mouse pads" is a Mousepad header and "CPU coolers" a Cooling one.
pub fn header_category(header: &str) -> Option<Category> {
    let padded = format!(" {}", normalize(header));
    Category::ALL
        .iter()
        .flat_map(|category| {
            category
                .header_aliases()
                .iter()
                .map(move |alias| (*category, *alias))
        })
        .filter(|(_, alias)| padded.contains(&format!(" {}", alias)))
        .max_by_key(|(_, alias)| alias.len())
        .map(|(category, _)| category)
}

/// Rebuild a snapshot from the kept product lines of `parsed`
///
/// Headers are re-emitted in front of the first kept line under them.
fn rebuild<F>(snapshot: &CatalogSnapshot, parsed: &ParsedSnapshot, keep: F) -> CatalogSnapshot
where
    F: Fn(&CatalogEntry) -> bool,
{
    let source = snapshot.lines();
    let mut lines: Vec<String> = Vec::new();
    let mut pending_header: Option<usize> = None;

    for (index, line) in parsed.lines.iter().enumerate() {
        match line {
            SnapshotLine::Header(_) => pending_header = Some(index),
            SnapshotLine::Product(entry) if keep(entry) => {
                if let Some(header) = pending_header.take() {
                    lines.push(source[header].clone());
                }
                lines.push(source[index].clone());
            }
            _ => {}
        }
    }

    CatalogSnapshot::from_lines(lines)
}

fn in_category(entry: &CatalogEntry, category: Category) -> bool {
    entry
        .category
        .as_deref()
        .and_then(header_category)
        .is_some_and(|c| c == category)
}

/// Product lines priced at or below `ceiling`
pub fn by_budget(snapshot: &CatalogSnapshot, ceiling: u64) -> CatalogSnapshot {
    let parsed = ParsedSnapshot::parse(snapshot);
    rebuild(snapshot, &parsed, |entry| entry.price <= ceiling as f64)
}

/// Sections whose header matches `category`
///
/// Fails open: when no header in the snapshot matches, the input is returned
/// unchanged so the caller still has something to show.
pub fn by_category(snapshot: &CatalogSnapshot, category: Category) -> CatalogSnapshot {
    let parsed = ParsedSnapshot::parse(snapshot);
    let has_section = parsed.lines.iter().any(|line| {
        matches!(line, SnapshotLine::Header(header) if header_category(header) == Some(category))
    });
    if !has_section {
        tracing::debug!(category = %category, "No matching header, keeping full catalog");
        return snapshot.clone();
    }
    rebuild(snapshot, &parsed, |entry| in_category(entry, category))
}

/// Lines of `category` within `ceiling`, most expensive first
///
/// An empty result is returned as is; widening to the budget-only view is
/// the caller's call.
pub fn by_budget_and_category(
    snapshot: &CatalogSnapshot,
    ceiling: u64,
    category: Category,
) -> CatalogSnapshot {
    let parsed = ParsedSnapshot::parse(snapshot);
    let mut matched: Vec<&CatalogEntry> = parsed
        .entries()
        .filter(|entry| entry.price <= ceiling as f64 && in_category(entry, category))
        .collect();
    if matched.is_empty() {
        return CatalogSnapshot::default();
    }

    matched.sort_by(|a, b| b.price.total_cmp(&a.price).then_with(|| a.name.cmp(&b.name)));

    let source = snapshot.lines();
    let header = matched
        .iter()
        .find_map(|entry| entry.category.clone())
        .unwrap_or_else(|| category.label().to_string());
    let lines = std::iter::once(header)
        .chain(matched.iter().map(|entry| source[entry.line].clone()));
    CatalogSnapshot::from_lines(lines)
}

fn mentions_brand(name_tokens: &[&str], normalized_name: &str, brand: &str) -> bool {
    let brand = normalize(brand);
    if brand.is_empty() {
        return false;
    }
    if brand.chars().count() <= 2 {
        name_tokens.contains(&brand.as_str())
    } else {
        normalized_name.contains(&brand)
    }
}

/// Lines whose name names any of `brands`
///
/// Two-letter codes ("lg", "hp") must be a whole token of the name.
pub fn by_brand<S: AsRef<str>>(snapshot: &CatalogSnapshot, brands: &[S]) -> CatalogSnapshot {
    let parsed = ParsedSnapshot::parse(snapshot);
    rebuild(snapshot, &parsed, |entry| {
        let name = normalize(&entry.name);
        let tokens: Vec<&str> = name.split(' ').collect();
        brands
            .iter()
            .any(|brand| mentions_brand(&tokens, &name, brand.as_ref()))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog() -> CatalogSnapshot {
        CatalogSnapshot::from_lines([
            "CPU",
            "Intel i5 13400F,154.00",
            "Intel i5 10400F,100.00",
            "AMD Ryzen 5 7600,210.00",
            "GPU",
            "RTX 4060,300.00",
            "Monitors",
            "LG 24MP400,95.00",
            "Samsung Odyssey G5,260.00",
        ])
    }

    #[test]
    fn test_header_category() {
        assert_eq!(header_category("CPU"), Some(Category::Cpu));
        assert_eq!(header_category("Процессоры"), Some(Category::Cpu));
        assert_eq!(header_category("CPU coolers"), Some(Category::Cooling));
        assert_eq!(header_category("Gaming mouse pads"), Some(Category::Mousepad));
        assert_eq!(header_category("Игровые мыши"), Some(Category::Mouse));
        assert_eq!(header_category("Блоки питания"), Some(Category::Psu));
        assert_eq!(header_category("Programs"), None);
    }

    #[test]
    fn test_by_budget_drops_empty_sections() {
        let filtered = by_budget(&catalog(), 150);
        assert_eq!(
            filtered.lines(),
            ["CPU", "Intel i5 10400F,100.00", "Monitors", "LG 24MP400,95.00"]
        );
    }

    #[test]
    fn test_by_category_and_idempotence() {
        let once = by_category(&catalog(), Category::Cpu);
        assert_eq!(once.len(), 4);
        assert_eq!(once.lines()[0], "CPU");
        assert_eq!(by_category(&once, Category::Cpu), once);
    }

    #[test]
    fn test_by_category_fails_open() {
        let catalog = catalog();
        assert_eq!(by_category(&catalog, Category::Chair), catalog);
    }

    #[test]
    fn test_by_budget_and_category_sorted_descending() {
        let filtered = by_budget_and_category(&catalog(), 250, Category::Cpu);
        assert_eq!(
            filtered.lines(),
            [
                "CPU",
                "AMD Ryzen 5 7600,210.00",
                "Intel i5 13400F,154.00",
                "Intel i5 10400F,100.00"
            ]
        );
        assert!(by_budget_and_category(&catalog(), 50, Category::Cpu).is_empty());
    }

    #[test]
    fn test_by_brand() {
        let filtered = by_brand(&catalog(), &["lg", "amd"]);
        assert_eq!(
            filtered.lines(),
            ["CPU", "AMD Ryzen 5 7600,210.00", "Monitors", "LG 24MP400,95.00"]
        );
        // "lg" never matches inside a word
        let none = by_brand(&CatalogSnapshot::from_lines(["Bulgarian keyboard,20"]), &["lg"]);
        assert!(none.is_empty());
    }

    #[test]
    fn test_filters_do_not_mutate_input() {
        let catalog = catalog();
        let before = catalog.clone();
        let _ = by_budget(&catalog, 100);
        let _ = by_brand(&catalog, &["intel"]);
        assert_eq!(catalog, before);
    }
}
