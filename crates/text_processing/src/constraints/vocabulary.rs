//! Keyword tables for category, purpose and brand detection
//!
//! All keywords are in normalized form (see [`crate::normalize`]), so Cyrillic
//! spellings are listed by their transliteration: "видеокарта" → "videokarta".
//! Tables are scanned in priority order and the first hit wins.

use once_cell::sync::Lazy;
use regex::Regex;
use retail_agent_core::{Category, Purpose};

use crate::normalize::NormalizedText;

/// How a keyword is matched against normalized text
#[derive(Debug)]
pub(crate) enum Keyword {
    /// Whole token equality
    Exact(&'static str),
    /// Some token starts with it
    Prefix(&'static str),
    /// Consecutive tokens
    Phrase(&'static str),
    /// Whole-token regex
    Pattern(Regex),
}

/// Normalized text prepared for keyword lookups
pub(crate) struct KeywordText<'a> {
    tokens: Vec<&'a str>,
    padded: String,
}

impl<'a> KeywordText<'a> {
    pub(crate) fn new(text: &'a NormalizedText) -> Self {
        Self {
            tokens: text.tokens().collect(),
            padded: format!(" {} ", text.normalized),
        }
    }

    pub(crate) fn has_token(&self, token: &str) -> bool {
        self.tokens.iter().any(|t| *t == token)
    }
}

impl Keyword {
    pub(crate) fn matches(&self, text: &KeywordText<'_>) -> bool {
        match self {
            Keyword::Exact(word) => text.has_token(word),
            Keyword::Prefix(prefix) => text.tokens.iter().any(|t| t.starts_with(prefix)),
            Keyword::Phrase(phrase) => text.padded.contains(&format!(" {} ", phrase)),
            Keyword::Pattern(re) => text.tokens.iter().any(|t| re.is_match(t)),
        }
    }
}

fn pattern(re: &str) -> Keyword {
    Keyword::Pattern(Regex::new(re).unwrap())
}

use Keyword::{Exact, Phrase, Prefix};

static CATEGORY_KEYWORDS: Lazy<Vec<(Category, Vec<Keyword>)>> = Lazy::new(|| {
    vec![
        (
            Category::Monitor,
            vec![Prefix("monitor"), Exact("ekran"), Exact("display"), Prefix("displey")],
        ),
        (
            Category::Gpu,
            vec![
                Prefix("videokart"),
                Prefix("videocard"),
                Phrase("video karta"),
                Phrase("video card"),
                Phrase("graphics card"),
                Exact("gpu"),
                Prefix("rtx"),
                Prefix("gtx"),
                Prefix("geforce"),
                Prefix("radeon"),
                pattern(r"^rx\d{0,4}$"),
            ],
        ),
        (
            Category::Motherboard,
            vec![
                Prefix("motherboard"),
                Prefix("materinsk"),
                Phrase("ona plata"),
                Phrase("mat plata"),
                Exact("mobo"),
                pattern(r"^[abhxz]\d{3}[a-z]?$"),
            ],
        ),
        (
            Category::Cpu,
            vec![
                Prefix("protsessor"),
                Prefix("processor"),
                Exact("cpu"),
                Prefix("ryzen"),
                pattern(r"^i[3579]$"),
            ],
        ),
        (
            Category::Ram,
            vec![
                Exact("ram"),
                Exact("ozu"),
                Exact("dimm"),
                Prefix("operativ"),
                Prefix("ddr"),
            ],
        ),
        (
            Category::Psu,
            vec![
                Exact("psu"),
                Phrase("power supply"),
                Phrase("blok pitaniya"),
                Phrase("quvvat bloki"),
            ],
        ),
        (Category::Case, vec![Exact("case"), Prefix("korpus")]),
        (
            Category::Cooling,
            vec![
                Prefix("kuler"),
                Prefix("cooler"),
                Prefix("cooling"),
                Prefix("sovutgich"),
                Prefix("sovutish"),
                Prefix("oxlajd"),
                Prefix("ventilyator"),
                Exact("aio"),
                Exact("fan"),
            ],
        ),
        (
            Category::Storage,
            vec![
                Exact("ssd"),
                Exact("hdd"),
                Exact("nvme"),
                Phrase("m 2"),
                Phrase("hard disk"),
                Prefix("nakopitel"),
                Prefix("disk"),
                Exact("xotira"),
            ],
        ),
        (
            Category::Keyboard,
            vec![Prefix("klaviatur"), Prefix("keyboard"), Prefix("klava")],
        ),
        (
            Category::Mouse,
            vec![
                Exact("mouse"),
                Exact("mysh"),
                Prefix("myshk"),
                Exact("mishka"),
                Prefix("sichqon"),
            ],
        ),
        (
            Category::Headset,
            vec![
                Prefix("naushnik"),
                Prefix("headset"),
                Prefix("headphone"),
                Prefix("quloqchin"),
                Prefix("garnitur"),
            ],
        ),
        (
            Category::Chair,
            vec![Prefix("kreslo"), Prefix("chair"), Exact("stul")],
        ),
        (
            Category::Mousepad,
            vec![
                Prefix("mousepad"),
                Phrase("mouse pad"),
                Prefix("kovrik"),
                Prefix("gilamcha"),
            ],
        ),
    ]
});

static PURPOSE_KEYWORDS: Lazy<Vec<(Purpose, Vec<Keyword>)>> = Lazy::new(|| {
    vec![
        (
            Purpose::Gaming,
            vec![
                Prefix("gaming"),
                Prefix("game"),
                Prefix("gamer"),
                Prefix("geym"),
                Prefix("oyin"),
                Prefix("igr"),
                Exact("pubg"),
                Exact("dota"),
                Exact("cs"),
                Prefix("cs2"),
                Prefix("valorant"),
                Prefix("fortnite"),
            ],
        ),
        (
            Purpose::Developer,
            vec![
                Prefix("dastur"),
                Prefix("programm"),
                Prefix("develop"),
                Prefix("razrabot"),
                Prefix("coding"),
                Exact("code"),
            ],
        ),
        (
            Purpose::Design,
            vec![
                Prefix("dizayn"),
                Prefix("dizain"),
                Prefix("design"),
                Prefix("photoshop"),
                Prefix("montaj"),
                Prefix("videomontaj"),
                Prefix("render"),
                Prefix("blender"),
            ],
        ),
        (Purpose::Server, vec![Prefix("server"), Prefix("hosting")]),
        (
            Purpose::Streaming,
            vec![Prefix("stream"), Prefix("strim"), Exact("obs")],
        ),
        (
            Purpose::Office,
            vec![
                Prefix("office"),
                Prefix("ofis"),
                Prefix("rabot"),
                Prefix("oqish"),
                Prefix("ucheb"),
                Exact("ish"),
                Exact("word"),
                Exact("excel"),
            ],
        ),
    ]
});

/// Multi-word brands, checked before single words
const BRAND_PHRASES: &[(&str, &str)] = &[
    ("western digital", "western digital"),
    ("cooler master", "cooler master"),
    ("be quiet", "be quiet"),
    ("g skill", "g.skill"),
    ("gskill", "g.skill"),
];

const BRAND_WORDS: &[&str] = &[
    "intel", "amd", "nvidia", "asus", "msi", "gigabyte", "asrock", "samsung", "kingston",
    "corsair", "logitech", "razer", "steelseries", "hyperx", "aoc", "benq", "dell", "lenovo",
    "acer", "xiaomi", "deepcool", "thermaltake", "zalman", "nzxt", "seagate", "crucial",
    "adata", "apple", "philips", "redragon", "a4tech", "bloody", "palit", "zotac", "sapphire",
    "powercolor", "gamemax", "aerocool", "arctic", "noctua", "hiksemi",
];

/// Codes too short for containment; they must be a whole token
const BRAND_CODES: &[&str] = &["lg", "hp", "wd"];

/// First category whose keywords appear in the text
pub(crate) fn detect_category(text: &KeywordText<'_>) -> Option<Category> {
    CATEGORY_KEYWORDS
        .iter()
        .find(|(_, keywords)| keywords.iter().any(|k| k.matches(text)))
        .map(|(category, _)| *category)
}

/// First purpose whose keywords appear in the text
pub(crate) fn detect_purpose(text: &KeywordText<'_>) -> Option<Purpose> {
    PURPOSE_KEYWORDS
        .iter()
        .find(|(_, keywords)| keywords.iter().any(|k| k.matches(text)))
        .map(|(purpose, _)| *purpose)
}

/// Known brands mentioned in the text, at most `max`, sorted
pub(crate) fn detect_brands(
    normalized: &NormalizedText,
    text: &KeywordText<'_>,
    max: usize,
) -> Vec<String> {
    let mut found: Vec<String> = Vec::new();
    let mut remaining = normalized.normalized.clone();

    for (phrase, brand) in BRAND_PHRASES {
        if remaining.contains(phrase) {
            found.push((*brand).to_string());
            // keep "cooler master" from also counting as a lone word later
            remaining = remaining.replace(phrase, " ");
        }
    }
    for word in BRAND_WORDS {
        if remaining.contains(word) {
            found.push((*word).to_string());
        }
    }
    for code in BRAND_CODES {
        if text.has_token(code) {
            found.push((*code).to_string());
        }
    }

    found.truncate(max);
    found.sort();
    found.dedup();
    found
}
