//! Selection helpers for listings built without the generator

use std::cmp::Ordering;

use crate::snapshot::CatalogEntry;

fn by_price_then_name(a: &CatalogEntry, b: &CatalogEntry) -> Ordering {
    a.price.total_cmp(&b.price).then_with(|| a.name.cmp(&b.name))
}

/// The `n` most expensive entries, most expensive first
pub fn top_by_price(entries: &[CatalogEntry], n: usize) -> Vec<CatalogEntry> {
    let mut sorted = entries.to_vec();
    sorted.sort_by(|a, b| b.price.total_cmp(&a.price).then_with(|| a.name.cmp(&b.name)));
    sorted.truncate(n);
    sorted
}

/// `n` entries spread evenly across the price range, cheapest first
///
/// One entry means the median; two or more always include the cheapest and
/// the most expensive.
pub fn representative(entries: &[CatalogEntry], n: usize) -> Vec<CatalogEntry> {
    let mut sorted = entries.to_vec();
    sorted.sort_by(by_price_then_name);

    let len = sorted.len();
    if n == 0 || len == 0 {
        return Vec::new();
    }
    if len <= n {
        return sorted;
    }
    if n == 1 {
        return vec![sorted[len / 2].clone()];
    }

    let mut picked: Vec<usize> = (0..n).map(|i| i * (len - 1) / (n - 1)).collect();
    picked.dedup();
    picked.into_iter().map(|i| sorted[i].clone()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(name: &str, price: f64) -> CatalogEntry {
        CatalogEntry {
            name: name.to_string(),
            price,
            category: Some("Monitor".to_string()),
            line: 0,
        }
    }

    fn prices(entries: &[CatalogEntry]) -> Vec<f64> {
        entries.iter().map(|e| e.price).collect()
    }

    #[test]
    fn test_top_by_price() {
        let entries = vec![entry("a", 10.0), entry("c", 30.0), entry("b", 30.0), entry("d", 20.0)];
        let top = top_by_price(&entries, 3);
        let names: Vec<&str> = top.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, ["b", "c", "d"]);
        assert!(top_by_price(&entries, 0).is_empty());
    }

    #[test]
    fn test_representative_spans_range() {
        let entries: Vec<_> = (1..=9).map(|i| entry(&format!("m{}", i), i as f64 * 10.0)).collect();
        assert_eq!(prices(&representative(&entries, 3)), [10.0, 50.0, 90.0]);
        assert_eq!(prices(&representative(&entries, 5)), [10.0, 30.0, 50.0, 70.0, 90.0]);
    }

    #[test]
    fn test_representative_median_and_small_inputs() {
        let entries = vec![entry("x", 40.0), entry("y", 10.0), entry("z", 20.0), entry("w", 30.0)];
        assert_eq!(prices(&representative(&entries, 1)), [30.0]);
        assert_eq!(prices(&representative(&entries, 10)), [10.0, 20.0, 30.0, 40.0]);
        assert!(representative(&[], 3).is_empty());
    }
}
