//! Text normalization
//!
//! Two canonical forms are produced from any user or catalog text:
//! - **normalized**: lower-cased, Cyrillic and extended Latin transliterated to
//!   Latin digraphs (ч → "ch", я → "ya"), every run of non letter/digit
//!   characters collapsed to one space, trimmed
//! - **compact**: the normalized form with all separators removed
//!
//! Soft/hard signs and apostrophes vanish without leaving a separator, so
//! "o'yin" and "oyin" normalize identically. Both forms are idempotent.

/// Transliteration of a single lower-case character
fn transliterate(c: char) -> Option<&'static str> {
    let mapped = match c {
        // Russian / Uzbek Cyrillic
        'а' => "a",
        'б' => "b",
        'в' => "v",
        'г' => "g",
        'д' => "d",
        'е' => "e",
        'ё' => "yo",
        'ж' => "j",
        'з' => "z",
        'и' => "i",
        'й' => "y",
        'к' => "k",
        'л' => "l",
        'м' => "m",
        'н' => "n",
        'о' => "o",
        'п' => "p",
        'р' => "r",
        'с' => "s",
        'т' => "t",
        'у' => "u",
        'ф' => "f",
        'х' => "x",
        'ц' => "ts",
        'ч' => "ch",
        'ш' => "sh",
        'щ' => "sh",
        'ы' => "y",
        'э' => "e",
        'ю' => "yu",
        'я' => "ya",
        'ў' => "o",
        'қ' => "q",
        'ғ' => "g",
        'ҳ' => "h",
        'і' => "i",
        'ї' => "yi",
        'є' => "ye",
        // Extended Latin
        'à' | 'á' | 'â' | 'ã' | 'ä' | 'å' => "a",
        'æ' => "ae",
        'ç' => "ch",
        'è' | 'é' | 'ê' | 'ë' => "e",
        'ì' | 'í' | 'î' | 'ï' | 'ı' => "i",
        'ñ' => "n",
        'ò' | 'ó' | 'ô' | 'õ' | 'ö' | 'ø' => "o",
        'œ' => "oe",
        'ù' | 'ú' | 'û' | 'ü' => "u",
        'ý' | 'ÿ' => "y",
        'ş' => "sh",
        'ğ' => "g",
        'ß' => "ss",
        _ => return None,
    };
    Some(mapped)
}

/// Characters removed without acting as a word separator
fn is_silent(c: char) -> bool {
    matches!(
        c,
        'ъ' | 'ь' | '\'' | '’' | '‘' | '`' | '´' | 'ʻ' | 'ʼ' | '\u{0307}'
    )
}

/// Normalize text for substring and token matching
pub fn normalize(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut pending_space = false;

    for upper in text.chars() {
        for c in upper.to_lowercase() {
            if is_silent(c) {
                continue;
            }

            let mapped = transliterate(c);
            if mapped.is_none() && !c.is_alphanumeric() {
                pending_space = true;
                continue;
            }

            if pending_space && !out.is_empty() {
                out.push(' ');
            }
            pending_space = false;

            match mapped {
                Some(latin) => out.push_str(latin),
                None => out.push(c),
            }
        }
    }

    out
}

/// Normalized text with every separator removed
pub fn compact(text: &str) -> String {
    normalize(text).chars().filter(|c| *c != ' ').collect()
}

/// Normalized tokens of a text
pub fn tokens(text: &str) -> Vec<String> {
    normalize(text)
        .split(' ')
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}

/// Both canonical forms of one text, computed once
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct NormalizedText {
    pub normalized: String,
    pub compact: String,
}

impl NormalizedText {
    pub fn new(text: &str) -> Self {
        let normalized = normalize(text);
        let compact = normalized.chars().filter(|c| *c != ' ').collect();
        Self {
            normalized,
            compact,
        }
    }

    pub fn tokens(&self) -> impl Iterator<Item = &str> {
        self.normalized.split(' ').filter(|t| !t.is_empty())
    }

    pub fn is_empty(&self) -> bool {
        self.normalized.is_empty()
    }
}

/// Whether a normalized token looks like a product model number
///
/// Model numbers carry a digit and at least four characters ("13400f",
/// "b760", "4060"). Capacity and frequency figures ("16gb", "144hz", "650w")
/// and memory generations ("ddr5") are not model numbers.
pub fn is_model_token(token: &str) -> bool {
    if token.chars().count() < 4 || !token.chars().any(|c| c.is_ascii_digit()) {
        return false;
    }

    if token.starts_with("ddr") {
        return false;
    }

    const UNIT_SUFFIXES: [&str; 6] = ["gb", "tb", "mb", "hz", "mm", "vt"];
    let unit_suffixed = |suffix: &str| {
        token
            .strip_suffix(suffix)
            .map(|head| !head.is_empty() && head.chars().all(|c| c.is_ascii_digit()))
            .unwrap_or(false)
    };
    if UNIT_SUFFIXES.iter().any(|s| unit_suffixed(s)) || unit_suffixed("w") {
        return false;
    }

    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lowercase_and_collapse() {
        assert_eq!(normalize("  Intel  i5-13400F!!  "), "intel i5 13400f");
        assert_eq!(normalize("RTX, 4060 / Ti"), "rtx 4060 ti");
        assert_eq!(normalize("---"), "");
        assert_eq!(normalize(""), "");
    }

    #[test]
    fn test_cyrillic_transliteration() {
        assert_eq!(normalize("Самсунг"), normalize("samsung"));
        assert_eq!(normalize("Чехол"), "chexol");
        assert_eq!(normalize("Яблоко"), "yabloko");
        assert_eq!(normalize("видеокарта"), "videokarta");
        assert_eq!(normalize("процессор"), "protsessor");
    }

    #[test]
    fn test_uzbek_forms_converge() {
        assert_eq!(normalize("o'yin"), "oyin");
        assert_eq!(normalize("oʻyin"), "oyin");
        assert_eq!(normalize("ўйин"), "oyin");
        assert_eq!(normalize("қулоқчин"), "quloqchin");
    }

    #[test]
    fn test_signs_are_silent() {
        assert_eq!(normalize("мышь"), "mysh");
        assert_eq!(normalize("объём"), "obyom");
        assert_eq!(normalize("накопитель SSD"), "nakopitel ssd");
    }

    #[test]
    fn test_extended_latin() {
        assert_eq!(normalize("Café Über"), "cafe uber");
        assert_eq!(normalize("İstanbul"), "istanbul");
    }

    #[test]
    fn test_idempotence() {
        let samples = [
            "Intel® Core™ i7-13700K (16 ядер)",
            "Монитор 27\" Samsung Odyssey G5",
            "o‘yin uchun kompyuter, narxi 1 200$",
            "ÀÉÎÕÜ ß œ",
            "İİ ıı",
            "日本語 テキスト 123",
            "   ",
        ];
        for sample in samples {
            let once = normalize(sample);
            assert_eq!(normalize(&once), once, "not idempotent for {:?}", sample);
            let compacted = compact(sample);
            assert_eq!(compact(&compacted), compacted);
        }
    }

    #[test]
    fn test_compact() {
        assert_eq!(compact("RTX 4060 Ti"), "rtx4060ti");
        assert_eq!(compact("i5-13400 F"), "i513400f");
        let text = NormalizedText::new("Intel i5 13400F");
        assert_eq!(text.compact, "inteli513400f");
        assert_eq!(text.tokens().collect::<Vec<_>>(), vec!["intel", "i5", "13400f"]);
    }

    #[test]
    fn test_tokens() {
        assert_eq!(tokens("13400F kerak!"), vec!["13400f", "kerak"]);
        assert!(tokens("  ").is_empty());
    }

    #[test]
    fn test_model_tokens() {
        assert!(is_model_token("13400f"));
        assert!(is_model_token("b760"));
        assert!(is_model_token("4060"));
        assert!(!is_model_token("i5"));
        assert!(!is_model_token("rtx"));
        assert!(!is_model_token("16gb"));
        assert!(!is_model_token("144hz"));
        assert!(!is_model_token("650w"));
        assert!(!is_model_token("ddr5"));
    }
}
