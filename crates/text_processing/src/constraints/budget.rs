//! Budget ceiling extraction
//!
//! Patterns are tried in a fixed order and the first acceptable number wins:
//! 1. `1k`, `1.5к`, `500 ming` (thousands)
//! 2. `2m`, `1.2 mln`, `3 million` (millions)
//! 3. keyword-anchored: `budget: 700`, `narxi 500`, `около 400`
//! 4. currency-tagged: `600$`, `$600`, `600 usd`, then local currency
//!    `5 000 000 so'm`, `500 000 so'mgacha`
//! 5. a bare numeral (2-7 digits, or space-grouped thousands like `500 000`)
//!    that is not part of a model name or a unit
//!
//! Every candidate must reach the configured floor, so "16$" is not a budget.

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

use crate::price::{find_currency_amounts, parse_price, NUMBER};

static THOUSANDS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b(\d{1,3}(?:[.,]\d{1,2})?)(\s?)(?:k|к|ming|тыс\w*|thousand)\b").unwrap()
});

static MILLIONS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b(\d{1,3}(?:[.,]\d{1,2})?)\s?(?:m|mln|million\w*|млн|миллион\w*)\b").unwrap()
});

static KEYWORD_ANCHORED: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(
        r"\b(?:budget|byudjet|budjet|бюджет|around|about|price|narx\w*|money|pul\w*|деньг\w*|цен\w*|около|примерно)\s*:?\s*\$?\s?({NUMBER})"
    ))
    .unwrap()
});

static DOLLAR_TAGGED: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(
        r"(?:\$\s?({NUMBER}))|(?:\b({NUMBER})(?:\$|\s?(?:usd|dollar\w*|долл\w*)\b))"
    ))
    .unwrap()
});

static BARE_NUMERAL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b(\d{1,3}(?: \d{3})+|\d{2,7})\b").unwrap());

static RESOLUTION_CONTEXT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"monitor|монитор|ekran|экран|display|uhd|\btv\b|resolution").unwrap()
});

/// Words that turn the following number into a model name
const MODEL_PREFIXES: &[&str] = &[
    "rtx", "gtx", "rx", "gt", "arc", "ryzen", "core", "ddr", "ddr3", "ddr4", "ddr5", "i3", "i5",
    "i7", "i9", "radeon", "geforce", "athlon", "pentium", "celeron", "xeon",
];

/// Units that turn the preceding number into a spec value
const UNITS: &[&str] = &[
    "gb", "tb", "mb", "ghz", "mhz", "hz", "w", "vt", "mm", "sm", "cm", "inch", "dyuym", "gb",
    "гб", "тб", "мб", "гц", "вт", "мм", "x", "\"",
];

/// Extract a budget ceiling from raw user text
pub fn extract_budget(text: &str, min_budget: u64) -> Option<u64> {
    let lowered = text.to_lowercase();
    let text = lowered.as_str();
    let accept = |value: Option<f64>| -> Option<u64> {
        let value = value?.round();
        (value.is_finite() && value >= min_budget as f64).then_some(value as u64)
    };

    if let Some(budget) = THOUSANDS
        .captures_iter(text)
        .filter(|caps| !is_resolution(caps, text))
        .find_map(|caps| accept(scaled(&caps[1], 1_000.0)))
    {
        return Some(budget);
    }

    if let Some(budget) = MILLIONS
        .captures_iter(text)
        .filter(|caps| !followed_by_decimal(caps, text))
        .find_map(|caps| accept(scaled(&caps[1], 1_000_000.0)))
    {
        return Some(budget);
    }

    if let Some(budget) = KEYWORD_ANCHORED
        .captures_iter(text)
        .find_map(|caps| accept(parse_price(&caps[1])))
    {
        return Some(budget);
    }

    if let Some(budget) = DOLLAR_TAGGED.captures_iter(text).find_map(|caps| {
        let number = caps.get(1).or_else(|| caps.get(2))?;
        accept(parse_price(number.as_str()))
    }) {
        return Some(budget);
    }

    if let Some(budget) = find_currency_amounts(text)
        .into_iter()
        .find_map(|amount| accept(Some(amount.value)))
    {
        return Some(budget);
    }

    BARE_NUMERAL
        .captures_iter(text)
        .filter_map(|caps| caps.get(1))
        .filter(|m| !after_model_prefix(&text[..m.start()]) && !before_unit(&text[m.end()..]))
        .find_map(|m| accept(parse_price(m.as_str())))
}

fn scaled(number: &str, factor: f64) -> Option<f64> {
    parse_price(number).map(|v| v * factor)
}

/// "4k monitor" is a resolution, not four thousand
fn is_resolution(caps: &Captures<'_>, text: &str) -> bool {
    caps[2].is_empty()
        && matches!(&caps[1], "2" | "4" | "8")
        && RESOLUTION_CONTEXT.is_match(text)
}

/// "1 m.2 ssd" is a form factor, not a million
fn followed_by_decimal(caps: &Captures<'_>, text: &str) -> bool {
    let Some(whole) = caps.get(0) else {
        return false;
    };
    let mut rest = text[whole.end()..].chars();
    rest.next() == Some('.') && rest.next().is_some_and(|c| c.is_ascii_digit())
}

fn after_model_prefix(before: &str) -> bool {
    before
        .split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
        .last()
        .is_some_and(|word| MODEL_PREFIXES.contains(&word))
}

fn before_unit(after: &str) -> bool {
    let after = after.trim_start();
    UNITS.iter().any(|unit| {
        after.strip_prefix(unit).is_some_and(|rest| {
            rest.chars()
                .next()
                .map_or(true, |c| !c.is_alphabetic())
        })
    })
}
