//! Textual catalog line parsing
//!
//! Product lines come in two shapes, tried in this order:
//! 1. delimited fields: `Intel i5 13400F,154.00` or `"Case, white";89` (quote
//!    aware, first field is the name, last field the price, comma thousands
//!    groups kept together)
//! 2. free form: `Intel i5 13400F - 154.00$` (price is the last
//!    currency-tagged number)
//!
//! A line neither parser accepts is a header when it carries no delimiter
//! and no price, otherwise it is malformed and skipped.

use retail_agent_core::CatalogSnapshot;
use retail_agent_text_processing::{last_currency_amount, parse_price};

const DELIMITERS: [char; 4] = [',', ';', '\t', '|'];

/// A priced product line
#[derive(Debug, Clone, PartialEq)]
pub struct CatalogEntry {
    pub name: String,
    pub price: f64,
    /// Text of the nearest preceding header, if any
    pub category: Option<String>,
    /// Index of the source line in the snapshot
    pub line: usize,
}

/// Classification of one snapshot line
#[derive(Debug, Clone, PartialEq)]
pub enum SnapshotLine {
    Header(String),
    Product(CatalogEntry),
    Malformed(String),
}

/// Strategy for turning one line into a name and a price
pub trait LineParser: Send + Sync {
    fn name(&self) -> &'static str;

    fn parse(&self, line: &str) -> Option<(String, f64)>;
}

/// Quote-aware delimited fields
pub struct DelimitedLineParser;

impl LineParser for DelimitedLineParser {
    fn name(&self) -> &'static str {
        "delimited"
    }

    fn parse(&self, line: &str) -> Option<(String, f64)> {
        DELIMITERS.iter().find_map(|&delimiter| {
            let fields = split_quoted(line, delimiter);
            if fields.len() < 2 {
                return None;
            }
            let name = fields.first()?.trim();
            let price = parse_price(fields.last()?)?;
            (!name.is_empty()).then(|| (name.to_string(), price))
        })
    }
}

/// `Name - 123.45$` style lines
pub struct FreeformLineParser;

impl LineParser for FreeformLineParser {
    fn name(&self) -> &'static str {
        "freeform"
    }

    fn parse(&self, line: &str) -> Option<(String, f64)> {
        let amount = last_currency_amount(line)?;
        let name = line[..amount.span.start]
            .trim_end_matches(|c: char| c.is_whitespace() || matches!(c, '-' | '–' | '—' | ':' | '=' | '|'))
            .trim();
        (!name.is_empty()).then(|| (name.to_string(), amount.value))
    }
}

static PARSERS: [&dyn LineParser; 2] = [&DelimitedLineParser, &FreeformLineParser];

/// Split on `delimiter` outside double quotes
///
/// A `"` opens a quoted field only at the start of a field and closes it
/// only before the next delimiter or the end of the line; anywhere else it
/// is a literal (`27" monitor`). `""` inside quotes is a literal quote. A
/// comma between a lone 1-3 digit field and a 3 digit group is a thousands
/// separator (`RTX 4090,1,599.00`).
fn split_quoted(line: &str, delimiter: char) -> Vec<String> {
    let chars: Vec<char> = line.chars().collect();
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];
        let rest = &chars[i + 1..];
        match c {
            '"' if in_quotes && rest.first() == Some(&'"') => {
                current.push('"');
                i += 1;
            }
            '"' if in_quotes && closes_field(rest, delimiter) => in_quotes = false,
            '"' if !in_quotes && current.trim().is_empty() => {
                current.clear();
                in_quotes = true;
            }
            c if c == delimiter
                && !in_quotes
                && !(delimiter == ',' && !fields.is_empty() && is_digit_group(&current, rest)) =>
            {
                fields.push(std::mem::take(&mut current));
            }
            c => current.push(c),
        }
        i += 1;
    }

    if in_quotes {
        // unbalanced quote: every quote is literal after all
        return line.split(delimiter).map(str::to_string).collect();
    }
    fields.push(current);
    fields
}

fn closes_field(rest: &[char], delimiter: char) -> bool {
    rest.iter()
        .find(|c| !c.is_whitespace())
        .map_or(true, |&c| c == delimiter)
}

/// `current` is a bare digit field (possibly already grouped) and `rest`
/// starts with exactly three digits
fn is_digit_group(current: &str, rest: &[char]) -> bool {
    let field = current.trim();
    let lead = field.split(',').next().unwrap_or_default();
    let grouped_so_far = !field.is_empty()
        && (1..=3).contains(&lead.len())
        && field.split(',').all(|part| part.chars().all(|c| c.is_ascii_digit()))
        && field.split(',').skip(1).all(|part| part.len() == 3);

    grouped_so_far
        && rest.len() >= 3
        && rest[..3].iter().all(|c| c.is_ascii_digit())
        && !rest.get(3).is_some_and(|c| c.is_ascii_digit())
}

fn has_delimiter(line: &str) -> bool {
    line.contains(|c: char| DELIMITERS.contains(&c))
}

/// Classify one line; `category` is the header it sits under
pub fn parse_line(line: &str, index: usize, category: Option<&str>) -> SnapshotLine {
    let trimmed = line.trim();
    for parser in PARSERS.iter() {
        if let Some((name, price)) = parser.parse(trimmed) {
            return SnapshotLine::Product(CatalogEntry {
                name,
                price,
                category: category.map(str::to_string),
                line: index,
            });
        }
    }

    if !has_delimiter(trimmed) && last_currency_amount(trimmed).is_none() {
        let header = trimmed
            .trim_matches(|c: char| !c.is_alphanumeric())
            .to_string();
        if !header.is_empty() {
            return SnapshotLine::Header(header);
        }
    }
    SnapshotLine::Malformed(trimmed.to_string())
}

/// A snapshot split into classified lines
#[derive(Debug, Clone, Default)]
pub struct ParsedSnapshot {
    pub lines: Vec<SnapshotLine>,
}

impl ParsedSnapshot {
    pub fn parse(snapshot: &CatalogSnapshot) -> Self {
        let mut current_header: Option<String> = None;
        let mut lines = Vec::with_capacity(snapshot.len());

        for (index, raw) in snapshot.lines().iter().enumerate() {
            let parsed = parse_line(raw, index, current_header.as_deref());
            if let SnapshotLine::Header(header) = &parsed {
                current_header = Some(header.clone());
            }
            lines.push(parsed);
        }

        let parsed = Self { lines };
        let malformed = parsed.malformed_count();
        if malformed > 0 {
            tracing::warn!(malformed, total = snapshot.len(), "Skipped malformed catalog lines");
        }
        parsed
    }

    pub fn entries(&self) -> impl Iterator<Item = &CatalogEntry> {
        self.lines.iter().filter_map(|line| match line {
            SnapshotLine::Product(entry) => Some(entry),
            _ => None,
        })
    }

    pub fn malformed_count(&self) -> usize {
        self.lines
            .iter()
            .filter(|line| matches!(line, SnapshotLine::Malformed(_)))
            .count()
    }
}
