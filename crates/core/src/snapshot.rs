//! Textual catalog snapshot
//!
//! Ordered lines where category headers are interleaved with "name, price"
//! product lines. A product line belongs to the nearest preceding header.

use std::sync::Arc;

/// Immutable, cheaply clonable catalog listing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogSnapshot {
    lines: Arc<[String]>,
}

impl Default for CatalogSnapshot {
    fn default() -> Self {
        Self {
            lines: Arc::from(Vec::new()),
        }
    }
}

impl CatalogSnapshot {
    pub fn from_lines<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            lines: lines.into_iter().map(Into::into).collect(),
        }
    }

    /// Split raw text into lines, dropping blank ones
    pub fn parse(text: &str) -> Self {
        Self::from_lines(
            text.lines()
                .map(str::trim)
                .filter(|line| !line.is_empty()),
        )
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Render back to newline-separated text
    pub fn to_text(&self) -> String {
        self.lines.join("\n")
    }
}
