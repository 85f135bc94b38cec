//! Fuzzy multi-signal ranking over typed products
//!
//! Each product accumulates score from independent signals:
//!
//! | Signal | Weight |
//! |---|---|
//! | normalized query inside name / composite text | 100 / 40 |
//! | compact query inside compact name / text | 80 / 30 |
//! | bigram similarity to compact name (query 4+ chars) | sim x 60 if >= 0.35, sim x 30 if >= 0.25 |
//! | query consonant signature inside name / text signature | 25 / 10 |
//! | per query token, first matching tier | 20 exact, 12 prefix, 8 substring, up to 6 fuzzy, 3 signature |
//!
//! Zero-score products are dropped. Results are ordered by score, then name.

use std::collections::HashSet;

use retail_agent_core::{Product, ScoredProduct};
use retail_agent_text_processing::{
    bigram_similarity, consonant_signature, edit_distance_within, max_edits_for, NormalizedText,
};

const NAME_CONTAINS: f64 = 100.0;
const TEXT_CONTAINS: f64 = 40.0;
const COMPACT_NAME_CONTAINS: f64 = 80.0;
const COMPACT_TEXT_CONTAINS: f64 = 30.0;
const BIGRAM_STRONG: (f64, f64) = (0.35, 60.0);
const BIGRAM_WEAK: (f64, f64) = (0.25, 30.0);
const BIGRAM_MIN_QUERY: usize = 4;
const SIGNATURE_NAME: f64 = 25.0;
const SIGNATURE_TEXT: f64 = 10.0;
const SIGNATURE_MIN_LEN: usize = 3;
const MIN_TOKEN_LEN: usize = 2;

/// A product with its match keys computed once at load time
#[derive(Debug, Clone)]
pub struct IndexedProduct {
    pub product: Product,
    name: NormalizedText,
    text: NormalizedText,
    name_signature: String,
    text_signature: String,
    tokens: HashSet<String>,
    token_signatures: HashSet<String>,
}

impl IndexedProduct {
    pub fn new(product: Product) -> Self {
        let name = NormalizedText::new(&product.name);
        let text = NormalizedText::new(&product.composite_text());
        let tokens: HashSet<String> = text.tokens().map(str::to_string).collect();
        let token_signatures = tokens
            .iter()
            .map(|t| consonant_signature(t))
            .filter(|s| s.chars().count() >= MIN_TOKEN_LEN)
            .collect();

        Self {
            name_signature: consonant_signature(&name.normalized),
            text_signature: consonant_signature(&text.normalized),
            name,
            text,
            tokens,
            token_signatures,
            product,
        }
    }
}

/// One tier of the per-token cascade
struct TokenMatcher {
    name: &'static str,
    score: fn(&str, &IndexedProduct) -> Option<f64>,
}

fn exact_token(token: &str, product: &IndexedProduct) -> Option<f64> {
    product.tokens.contains(token).then_some(20.0)
}

fn prefix_token(token: &str, product: &IndexedProduct) -> Option<f64> {
    product
        .tokens
        .iter()
        .any(|t| t.starts_with(token))
        .then_some(12.0)
}

fn substring_token(token: &str, product: &IndexedProduct) -> Option<f64> {
    product
        .tokens
        .iter()
        .any(|t| t.contains(token))
        .then_some(8.0)
}

/// Bonus shrinks as the distance approaches the length-adaptive cap
fn fuzzy_token(token: &str, product: &IndexedProduct) -> Option<f64> {
    let max = max_edits_for(token.chars().count());
    if max == 0 {
        return None;
    }
    let best = product
        .tokens
        .iter()
        .filter_map(|t| edit_distance_within(token, t, max))
        .min()?;
    Some(6.0 * (1.0 - best as f64 / (max + 1) as f64))
}

fn signature_token(token: &str, product: &IndexedProduct) -> Option<f64> {
    let signature = consonant_signature(token);
    (signature.chars().count() >= MIN_TOKEN_LEN && product.token_signatures.contains(&signature))
        .then_some(3.0)
}

static TOKEN_MATCHERS: &[TokenMatcher] = &[
    TokenMatcher { name: "exact", score: exact_token },
    TokenMatcher { name: "prefix", score: prefix_token },
    TokenMatcher { name: "substring", score: substring_token },
    TokenMatcher { name: "fuzzy", score: fuzzy_token },
    TokenMatcher { name: "signature", score: signature_token },
];

/// Query text prepared once per search
struct RankQuery {
    text: NormalizedText,
    signature: String,
    tokens: Vec<String>,
}

impl RankQuery {
    fn new(query: &str) -> Self {
        let text = NormalizedText::new(query);
        let signature = consonant_signature(&text.normalized);
        let tokens = text
            .tokens()
            .filter(|t| t.chars().count() >= MIN_TOKEN_LEN)
            .map(str::to_string)
            .collect();
        Self {
            text,
            signature,
            tokens,
        }
    }
}

fn score(query: &RankQuery, product: &IndexedProduct) -> f64 {
    let mut score = 0.0;
    let normalized = &query.text.normalized;
    let compact = &query.text.compact;

    if product.name.normalized.contains(normalized.as_str()) {
        score += NAME_CONTAINS;
    } else if product.text.normalized.contains(normalized.as_str()) {
        score += TEXT_CONTAINS;
    }

    if product.name.compact.contains(compact.as_str()) {
        score += COMPACT_NAME_CONTAINS;
    } else if product.text.compact.contains(compact.as_str()) {
        score += COMPACT_TEXT_CONTAINS;
    }

    if compact.chars().count() >= BIGRAM_MIN_QUERY {
        let similarity = bigram_similarity(compact, &product.name.compact);
        if similarity >= BIGRAM_STRONG.0 {
            score += similarity * BIGRAM_STRONG.1;
        } else if similarity >= BIGRAM_WEAK.0 {
            score += similarity * BIGRAM_WEAK.1;
        }
    }

    if query.signature.chars().count() >= SIGNATURE_MIN_LEN {
        if product.name_signature.contains(&query.signature) {
            score += SIGNATURE_NAME;
        } else if product.text_signature.contains(&query.signature) {
            score += SIGNATURE_TEXT;
        }
    }

    for token in &query.tokens {
        for matcher in TOKEN_MATCHERS {
            if let Some(bonus) = (matcher.score)(token, product) {
                tracing::trace!(token = %token, tier = matcher.name, bonus, "Token matched");
                score += bonus;
                break;
            }
        }
    }

    score
}

/// Rank `products` against `query`, best first
pub fn rank<'a, I>(query: &str, products: I) -> Vec<ScoredProduct>
where
    I: IntoIterator<Item = &'a IndexedProduct>,
{
    let query = RankQuery::new(query);
    if query.text.is_empty() {
        return Vec::new();
    }

    let mut scored: Vec<ScoredProduct> = products
        .into_iter()
        .filter_map(|indexed| {
            let score = score(&query, indexed);
            (score > 0.0).then(|| ScoredProduct {
                product: indexed.product.clone(),
                score,
            })
        })
        .collect();

    scored.sort_by(|a, b| {
        b.score
            .total_cmp(&a.score)
            .then_with(|| a.product.name.cmp(&b.product.name))
    });
    scored
}
