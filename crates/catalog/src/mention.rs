//! Does the user text name a catalog line?
//!
//! A line is mentioned when any of these holds:
//! - its normalized or compact name (4+ chars) appears in the user text
//! - every model-number token of the name appears, in any order, as a user
//!   token (or, for 5+ chars, inside the compact user text), and so does
//!   every word after the last model number ("Ti", "Super", "XT")
//! - for names without model numbers, every name token of 2+ chars is a user
//!   token, and there are at least two of them

use std::collections::HashSet;

use retail_agent_text_processing::{is_model_token, NormalizedText};

use crate::snapshot::CatalogEntry;

const MIN_CONTAINED_NAME: usize = 4;
const MIN_EMBEDDED_MODEL: usize = 5;

/// User text prepared for repeated mention checks
#[derive(Debug, Clone)]
pub struct MentionQuery {
    text: NormalizedText,
    padded: String,
    tokens: HashSet<String>,
}

impl MentionQuery {
    pub fn new(user_text: &str) -> Self {
        let text = NormalizedText::new(user_text);
        let padded = format!(" {} ", text.normalized);
        let tokens = text.tokens().map(str::to_string).collect();
        Self {
            text,
            padded,
            tokens,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Whether `name` is named by the user text
    pub fn mentions(&self, name: &str) -> bool {
        if self.is_empty() {
            return false;
        }
        let name = NormalizedText::new(name);
        if name.is_empty() {
            return false;
        }

        if name.normalized.chars().count() >= MIN_CONTAINED_NAME
            && self.padded.contains(&format!(" {} ", name.normalized))
        {
            return true;
        }
        if name.compact.chars().count() >= MIN_CONTAINED_NAME
            && self.text.compact.contains(&name.compact)
        {
            return true;
        }

        let tokens: Vec<&str> = name.tokens().collect();
        if let Some(last_model) = tokens.iter().rposition(|t| is_model_token(t)) {
            let models_present = tokens.iter().filter(|t| is_model_token(t)).all(|model| {
                self.tokens.contains(*model)
                    || (model.chars().count() >= MIN_EMBEDDED_MODEL
                        && self.text.compact.contains(model))
            });
            return models_present
                && tokens[last_model + 1..]
                    .iter()
                    .all(|qualifier| self.tokens.contains(*qualifier));
        }

        let words: Vec<&str> = name.tokens().filter(|t| t.chars().count() >= 2).collect();
        words.len() >= 2 && words.iter().all(|word| self.tokens.contains(*word))
    }

    /// Whether every token of `name` is a user token
    ///
    /// Stricter than [`mentions`](Self::mentions): "rtx 4060" fully names
    /// "RTX 4060" but only loosely matches "MSI RTX 4060".
    pub fn names_exactly(&self, name: &str) -> bool {
        let name = NormalizedText::new(name);
        !name.is_empty() && name.tokens().all(|token| self.tokens.contains(token))
    }
}

/// Normalized token set of a catalog name
pub fn name_tokens(name: &str) -> HashSet<String> {
    NormalizedText::new(name).tokens().map(str::to_string).collect()
}

/// Entries named by the user text, in catalog order
pub fn mentioned_entries<'a, I>(entries: I, user_text: &str) -> Vec<&'a CatalogEntry>
where
    I: IntoIterator<Item = &'a CatalogEntry>,
{
    let query = MentionQuery::new(user_text);
    if query.is_empty() {
        return Vec::new();
    }
    entries
        .into_iter()
        .filter(|entry| query.mentions(&entry.name))
        .collect()
}
