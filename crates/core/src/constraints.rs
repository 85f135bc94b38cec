//! Shopping constraints extracted from free-form user text

use serde::{Deserialize, Serialize};
use std::fmt;

/// Product category, in extractor priority order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    Monitor,
    Gpu,
    Motherboard,
    Cpu,
    Ram,
    Psu,
    Case,
    Cooling,
    Storage,
    Keyboard,
    Mouse,
    Headset,
    Chair,
    Mousepad,
}

impl Category {
    /// All categories in fixed priority order
    pub const ALL: [Category; 14] = [
        Category::Monitor,
        Category::Gpu,
        Category::Motherboard,
        Category::Cpu,
        Category::Ram,
        Category::Psu,
        Category::Case,
        Category::Cooling,
        Category::Storage,
        Category::Keyboard,
        Category::Mouse,
        Category::Headset,
        Category::Chair,
        Category::Mousepad,
    ];

    /// Canonical label as used in catalog headers
    pub fn label(&self) -> &'static str {
        match self {
            Category::Monitor => "Monitor",
            Category::Gpu => "GPU",
            Category::Motherboard => "Motherboard",
            Category::Cpu => "CPU",
            Category::Ram => "RAM",
            Category::Psu => "PSU",
            Category::Case => "Case",
            Category::Cooling => "Cooling",
            Category::Storage => "Storage",
            Category::Keyboard => "Keyboard",
            Category::Mouse => "Mouse",
            Category::Headset => "Headset",
            Category::Chair => "Chair",
            Category::Mousepad => "Mousepad",
        }
    }

    /// Header aliases in normalized (lower-case, transliterated) form
    ///
    /// A catalog header belongs to the category whose alias it contains at a
    /// word start, preferring the longest alias ("mouse pad" over "mouse").
    pub fn header_aliases(&self) -> &'static [&'static str] {
        match self {
            Category::Monitor => &["monitor", "display", "ekran"],
            Category::Gpu => &["gpu", "videokart", "video kart", "video card", "graphics"],
            Category::Motherboard => &["motherboard", "materinsk", "ona plata", "mainboard"],
            Category::Cpu => &["cpu", "protsessor", "processor"],
            Category::Ram => &["ram", "operativ", "memory", "ddr"],
            Category::Psu => &["psu", "power supply", "pitani", "quvvat blok"],
            Category::Case => &["case", "korpus"],
            Category::Cooling => &["cooling", "cooler", "kuler", "sovutish", "oxlajd"],
            Category::Storage => &["storage", "ssd", "hdd", "nakopitel", "disk"],
            Category::Keyboard => &["keyboard", "klaviatur"],
            Category::Mouse => &["mouse", "mysh", "sichqoncha"],
            Category::Headset => &["headset", "naushnik", "quloqchin", "headphone"],
            Category::Chair => &["chair", "kresl", "stul"],
            Category::Mousepad => &["mousepad", "mouse pad", "kovrik"],
        }
    }

    /// Parse a canonical label (case-insensitive)
    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|c| c.label().eq_ignore_ascii_case(label.trim()))
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Intended use of the purchase, in extractor priority order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Purpose {
    Gaming,
    Developer,
    Design,
    Server,
    Streaming,
    Office,
}

impl Purpose {
    pub const ALL: [Purpose; 6] = [
        Purpose::Gaming,
        Purpose::Developer,
        Purpose::Design,
        Purpose::Server,
        Purpose::Streaming,
        Purpose::Office,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Purpose::Gaming => "Gaming",
            Purpose::Developer => "Developer",
            Purpose::Design => "Design",
            Purpose::Server => "Server",
            Purpose::Streaming => "Streaming",
            Purpose::Office => "Office",
        }
    }
}

impl fmt::Display for Purpose {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Constraints parsed from one utterance (plus history carry-over)
///
/// Every field is optional; absence is explicit rather than a zero default.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractedConstraints {
    /// Budget ceiling, at least the configured floor when present
    pub budget: Option<u64>,
    pub category: Option<Category>,
    /// Up to two normalized brand tokens, sorted
    pub brands: Vec<String>,
    pub purpose: Option<Purpose>,
}

impl ExtractedConstraints {
    /// Budget, purpose and category are all known
    pub fn is_saturated(&self) -> bool {
        self.budget.is_some() && self.purpose.is_some() && self.category.is_some()
    }

    pub fn is_empty(&self) -> bool {
        self.budget.is_none()
            && self.category.is_none()
            && self.brands.is_empty()
            && self.purpose.is_none()
    }
}

impl fmt::Display for ExtractedConstraints {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut parts = Vec::new();
        if let Some(budget) = self.budget {
            parts.push(format!("budget<={}$", budget));
        }
        if let Some(category) = self.category {
            parts.push(format!("category={}", category));
        }
        if !self.brands.is_empty() {
            parts.push(format!("brands={}", self.brands.join("/")));
        }
        if let Some(purpose) = self.purpose {
            parts.push(format!("purpose={}", purpose));
        }
        if parts.is_empty() {
            f.write_str("none")
        } else {
            f.write_str(&parts.join(", "))
        }
    }
}
