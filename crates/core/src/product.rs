//! Typed catalog products

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A product in the typed catalog
///
/// Owned by the catalog store and replaced wholesale on reload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    /// Unique product identifier
    pub id: String,
    /// Display name (e.g. "Intel i5 13400F")
    pub name: String,
    /// Category label as provided by ingestion
    #[serde(default)]
    pub category: String,
    /// Free-form description
    #[serde(default)]
    pub description: String,
    /// Price in the shop currency, never negative
    pub price: f64,
    /// Units in stock; zero or less means unavailable
    #[serde(default)]
    pub stock: i64,
    /// Spec attributes (e.g. "socket" -> "LGA1700")
    #[serde(default)]
    pub specs: BTreeMap<String, String>,
}

impl Product {
    pub fn new(id: impl Into<String>, name: impl Into<String>, price: f64) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            category: String::new(),
            description: String::new(),
            price,
            stock: 0,
            specs: BTreeMap::new(),
        }
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_stock(mut self, stock: i64) -> Self {
        self.stock = stock;
        self
    }

    pub fn with_spec(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.specs.insert(key.into(), value.into());
        self
    }

    /// Whether the product can be sold right now
    pub fn is_available(&self) -> bool {
        self.stock > 0
    }

    /// Name, category, description and spec keys/values joined for matching
    pub fn composite_text(&self) -> String {
        let mut text = String::with_capacity(
            self.name.len() + self.category.len() + self.description.len() + 32,
        );
        text.push_str(&self.name);
        text.push(' ');
        text.push_str(&self.category);
        text.push(' ');
        text.push_str(&self.description);
        for (key, value) in &self.specs {
            text.push(' ');
            text.push_str(key);
            text.push(' ');
            text.push_str(value);
        }
        text
    }
}

/// A ranked search hit
///
/// The score is unitless and only meaningful relative to other hits of the
/// same query.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoredProduct {
    pub product: Product,
    pub score: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ingested_json_fills_defaults() {
        let product: Product =
            serde_json::from_str(r#"{"id":"gpu-1","name":"RTX 4060","price":300.0}"#).unwrap();
        assert_eq!(product, Product::new("gpu-1", "RTX 4060", 300.0));
        assert!(!product.is_available());
    }

    #[test]
    fn test_composite_text_includes_specs() {
        let product = Product::new("p1", "Intel i5 13400F", 154.0)
            .with_category("CPU")
            .with_description("10 cores")
            .with_spec("socket", "LGA1700");

        let text = product.composite_text();
        assert!(text.contains("Intel i5 13400F"));
        assert!(text.contains("CPU"));
        assert!(text.contains("socket LGA1700"));
    }

    #[test]
    fn test_availability() {
        let product = Product::new("p1", "RTX 4060", 300.0);
        assert!(!product.is_available());
        assert!(product.with_stock(2).is_available());
    }
}
