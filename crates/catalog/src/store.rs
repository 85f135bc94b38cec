//! Typed catalog store
//!
//! One reader/writer lock guards the whole index. Lookups and searches share
//! the read lock; `reload` and `upsert_many` take the write lock only for the
//! final swap, after match keys have been computed outside it.

use parking_lot::RwLock;
use std::collections::HashMap;

use retail_agent_core::{Product, ScoredProduct};

use crate::ranking::{rank, IndexedProduct};
use crate::CatalogError;

#[derive(Default)]
struct CatalogIndex {
    products: Vec<IndexedProduct>,
    by_id: HashMap<String, usize>,
}

impl CatalogIndex {
    fn upsert(&mut self, indexed: IndexedProduct) {
        match self.by_id.get(&indexed.product.id) {
            Some(&slot) => self.products[slot] = indexed,
            None => {
                self.by_id
                    .insert(indexed.product.id.clone(), self.products.len());
                self.products.push(indexed);
            }
        }
    }
}

/// Shared, lock-guarded product catalog
///
/// Construct once and hand out behind an `Arc`.
#[derive(Default)]
pub struct CatalogStore {
    index: RwLock<CatalogIndex>,
}

impl CatalogStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_products(products: Vec<Product>) -> Self {
        let store = Self::new();
        store.reload(products);
        store
    }

    /// Replace the whole catalog; returns how many products were accepted
    pub fn reload(&self, products: Vec<Product>) -> usize {
        let mut index = CatalogIndex::default();
        for indexed in prepare(products) {
            index.upsert(indexed);
        }
        let loaded = index.products.len();

        *self.index.write() = index;
        tracing::info!(products = loaded, "Catalog reloaded");
        loaded
    }

    /// Insert new products and replace existing ones by id
    pub fn upsert_many(&self, products: Vec<Product>) -> usize {
        let prepared = prepare(products);
        let count = prepared.len();

        let mut index = self.index.write();
        for indexed in prepared {
            index.upsert(indexed);
        }
        tracing::info!(upserted = count, total = index.products.len(), "Catalog upserted");
        count
    }

    pub fn get_all(&self) -> Vec<Product> {
        self.index
            .read()
            .products
            .iter()
            .map(|indexed| indexed.product.clone())
            .collect()
    }

    pub fn get_by_id(&self, id: &str) -> Result<Product, CatalogError> {
        let index = self.index.read();
        index
            .by_id
            .get(id)
            .map(|&slot| index.products[slot].product.clone())
            .ok_or_else(|| CatalogError::NotFound(format!("product {}", id)))
    }

    /// Best `limit` matches for `query`
    pub fn search(&self, query: &str, limit: usize) -> Vec<ScoredProduct> {
        let mut results = {
            let index = self.index.read();
            rank(query, &index.products)
        };
        results.truncate(limit);
        tracing::debug!(query = %query, results = results.len(), "Catalog search");
        results
    }

    pub fn len(&self) -> usize {
        self.index.read().products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn validate(product: &Product) -> Result<(), CatalogError> {
    if product.id.trim().is_empty() {
        return Err(CatalogError::InvalidProduct {
            id: product.name.clone(),
            reason: "empty id".to_string(),
        });
    }
    if !product.price.is_finite() || product.price < 0.0 {
        return Err(CatalogError::InvalidProduct {
            id: product.id.clone(),
            reason: format!("price {} must be a non-negative number", product.price),
        });
    }
    Ok(())
}

/// Validate and index outside the lock; invalid products are skipped
fn prepare(products: Vec<Product>) -> Vec<IndexedProduct> {
    products
        .into_iter()
        .filter_map(|product| match validate(&product) {
            Ok(()) => Some(IndexedProduct::new(product)),
            Err(e) => {
                tracing::warn!(error = %e, "Skipping invalid product");
                None
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn products() -> Vec<Product> {
        vec![
            Product::new("cpu-1", "Intel i5 13400F", 154.0).with_category("CPU"),
            Product::new("gpu-1", "RTX 4060", 300.0).with_category("GPU"),
        ]
    }

    #[test]
    fn test_reload_replaces_wholesale() {
        let store = CatalogStore::with_products(products());
        assert_eq!(store.len(), 2);

        store.reload(vec![Product::new("m-1", "AOC 24G2", 150.0)]);
        assert_eq!(store.len(), 1);
        assert!(store.get_by_id("cpu-1").is_err());
        assert_eq!(store.get_by_id("m-1").unwrap().name, "AOC 24G2");
    }

    #[test]
    fn test_upsert_replaces_by_id() {
        let store = CatalogStore::with_products(products());
        store.upsert_many(vec![
            Product::new("cpu-1", "Intel i5 13400F", 149.0),
            Product::new("ram-1", "Kingston Fury 16GB", 45.0),
        ]);
        assert_eq!(store.len(), 3);
        assert_eq!(store.get_by_id("cpu-1").unwrap().price, 149.0);
    }

    #[test]
    fn test_invalid_products_skipped() {
        let store = CatalogStore::new();
        let loaded = store.reload(vec![
            Product::new("bad", "Broken", -1.0),
            Product::new("nan", "Broken", f64::NAN),
            Product::new("", "No id", 10.0),
            Product::new("ok", "Fine", 0.0),
        ]);
        assert_eq!(loaded, 1);
        assert!(store.get_by_id("bad").is_err());
    }

    #[test]
    fn test_get_by_id_not_found_maps_to_core() {
        let store = CatalogStore::new();
        let err: retail_agent_core::Error = store.get_by_id("missing").unwrap_err().into();
        assert!(err.is_not_found());
        assert!(store.is_empty());
    }

    #[test]
    fn test_search_limit() {
        let store = CatalogStore::with_products(products());
        let results = store.search("intel", 1);
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].product.id, "cpu-1");
    }

    #[test]
    fn test_concurrent_readers_and_writer() {
        let store = Arc::new(CatalogStore::with_products(products()));
        std::thread::scope(|scope| {
            for _ in 0..4 {
                let store = Arc::clone(&store);
                scope.spawn(move || {
                    for _ in 0..50 {
                        let results = store.search("rtx 4060", 5);
                        assert!(results.iter().all(|r| r.score > 0.0));
                    }
                });
            }
            let writer = Arc::clone(&store);
            scope.spawn(move || {
                for i in 0..20 {
                    writer.upsert_many(vec![Product::new(format!("x-{}", i), "RTX 4060 Ti", 400.0)]);
                }
            });
        });
        assert_eq!(store.len(), 22);
    }
}
