//! Text processing for the retail assistant
//!
//! This crate provides the language-facing building blocks:
//! - **Normalization**: case folding, Cyrillic/extended-Latin transliteration,
//!   punctuation collapsing into normalized and compact forms
//! - **Similarity**: bounded edit distance, bigram Jaccard, consonant signatures
//! - **Prices**: currency-aware number parsing shared by filtering and validation
//! - **Constraints**: budget, purpose, category and brand extraction with
//!   history carry-over
//!
//! Everything here is pure and errorless; malformed input yields `None` or an
//! empty result.
//!
//! # Example
//!
//! ```
//! use retail_agent_text_processing::{normalize, ConstraintExtractor};
//!
//! assert_eq!(normalize("Самсунг"), normalize("samsung"));
//!
//! let extractor = ConstraintExtractor::new();
//! let constraints = extractor.extract("gaming uchun videokarta 1.5k");
//! assert_eq!(constraints.budget, Some(1500));
//! ```

pub mod constraints;
pub mod normalize;
pub mod price;
pub mod similarity;

pub use constraints::{extract_budget, ConstraintExtractor};
pub use normalize::{compact, is_model_token, normalize, tokens, NormalizedText};
pub use price::{find_currency_amounts, last_currency_amount, parse_price, CurrencyAmount};
pub use similarity::{
    bigram_similarity, consonant_signature, edit_distance_within, levenshtein, max_edits_for,
};
