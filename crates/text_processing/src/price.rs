//! Currency-aware number parsing
//!
//! Catalog lines and generated replies quote prices in several notations:
//! `154.00$`, `$154`, `1,299.99 USD`, `1 500 000 so'm`, `2.500.000 сум`,
//! `154,00 €`. Everything here turns those into plain `f64` values.

use once_cell::sync::Lazy;
use regex::Regex;
use std::ops::Range;

/// Number shapes: space-grouped thousands, or a digit run with separators
pub(crate) const NUMBER: &str = r"\d{1,3}(?:[ \x{A0}\x{202F}]\d{3})+(?:[.,]\d{1,2})?|\d[\d.,]*\d|\d";

/// Currency words and symbols, stripped before parsing
static CURRENCY_MARKERS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)\$|€|₽|\busd\b|\beur\b|\bdollars?\b|\b(?:so['’‘ʻ`]?m|sum)(?:gacha|dan|lik)?\b|сум|сўм|\bруб\w*|\brub\b|\by\.?e\.?|у\.?е\.?",
    )
    .unwrap()
});

/// Number followed by a currency marker, or `$`/`usd` followed by a number
///
/// Uzbek case suffixes on the local currency are accepted (`so'mgacha`).
/// A suffixed `$` must touch the digits so that `4060 $300` reads as `$300`.
static CURRENCY_AMOUNT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(
        r"(?i)(?:(?:\$|\busd)\s?(?P<prefixed>{NUMBER}))|(?:\b(?P<suffixed>{NUMBER})(?:\$|\s?[€₽]|\s?(?:usd|dollars?|(?:so['’‘ʻ`]?m|sum)(?:gacha|dan|lik)?|сум|сўм|eur|руб\w*|rub)\b))"
    ))
    .unwrap()
});

static COMMA_THOUSANDS: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d{1,3}(?:,\d{3})+$").unwrap());
static DOT_THOUSANDS: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d{1,3}(?:\.\d{3})+$").unwrap());

/// A currency-tagged number found in free text
#[derive(Debug, Clone, PartialEq)]
pub struct CurrencyAmount {
    pub value: f64,
    /// Byte span of the whole mention, currency marker included
    pub span: Range<usize>,
    /// Byte span of the digits only
    pub number: Range<usize>,
}

/// Parse a price string into a non-negative finite number
///
/// Currency markers, spaces and thousands separators are removed first.
/// Separator handling:
/// - both `,` and `.`: whichever comes last is the decimal point
/// - only commas: `1,299` / `1,299,000` are thousands, `154,50` is decimal
/// - several dots: only accepted as `2.500.000` style thousands
pub fn parse_price(raw: &str) -> Option<f64> {
    let stripped = CURRENCY_MARKERS.replace_all(raw, "");
    let digits: String = stripped
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '\u{A0}' && *c != '\u{202F}')
        .collect();

    if digits.is_empty()
        || !digits.chars().any(|c| c.is_ascii_digit())
        || !digits.chars().all(|c| c.is_ascii_digit() || c == '.' || c == ',')
    {
        return None;
    }

    let canonical = canonical_number(&digits)?;
    let value: f64 = canonical.parse().ok()?;
    (value.is_finite() && value >= 0.0).then_some(value)
}

fn canonical_number(digits: &str) -> Option<String> {
    let commas = digits.matches(',').count();
    let dots = digits.matches('.').count();

    match (commas, dots) {
        (0, 0) | (0, 1) => Some(digits.to_string()),
        (_, 0) => {
            if COMMA_THOUSANDS.is_match(digits) {
                Some(digits.replace(',', ""))
            } else if commas == 1 {
                Some(digits.replace(',', "."))
            } else {
                None
            }
        }
        (0, _) => DOT_THOUSANDS
            .is_match(digits)
            .then(|| digits.replace('.', "")),
        _ => {
            let last_comma = digits.rfind(',')?;
            let last_dot = digits.rfind('.')?;
            if last_dot > last_comma {
                // 1,299.99
                (dots == 1).then(|| digits.replace(',', ""))
            } else {
                // 1.299,99
                (commas == 1).then(|| digits.replace('.', "").replace(',', "."))
            }
        }
    }
}

/// Every currency-tagged number in `text`, in order of appearance
pub fn find_currency_amounts(text: &str) -> Vec<CurrencyAmount> {
    CURRENCY_AMOUNT
        .captures_iter(text)
        .filter_map(|caps| {
            let whole = caps.get(0)?;
            let number = caps.name("prefixed").or_else(|| caps.name("suffixed"))?;
            let value = parse_price(number.as_str())?;
            Some(CurrencyAmount {
                value,
                span: whole.range(),
                number: number.range(),
            })
        })
        .collect()
}

/// Last currency-tagged number in `text`
pub fn last_currency_amount(text: &str) -> Option<CurrencyAmount> {
    find_currency_amounts(text).pop()
}
