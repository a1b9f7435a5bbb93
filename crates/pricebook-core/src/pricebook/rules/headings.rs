//! Heading vocabulary.
//!
//! The lists are approximations of the price-list layout: a line containing
//! one of these words is taken as a heading even when it is not one.

/// Words that mark a line as a section or subsection heading (case-insensitive).
pub const HEADING_KEYWORDS: &[&str] = &[
    "Core Packs",
    "Boiler",
    "Heat Pump",
    "ASHP",
    "Radiator",
    "Hive",
    "Smart",
    "Flue",
    "Extra",
    "Price Alignment",
    "Combi",
    "System",
    "Regular",
    "Natural Gas",
    "LPG",
    "Controls",
    "Electrics",
    "Waste",
    "Filling Loop",
    "Worcester",
    "Vaillant",
    "Active Heating",
    "TRV",
    "Full System",
    "Part System",
    "Wiring",
    "Stats",
    "Timer",
    "Programmer",
];

/// Uppercase markers that start a new top-level section.
pub const MAJOR_SECTION_MARKERS: &[&str] = &[
    "BOILERS",
    "CORE PACKS",
    "HEAT PUMPS",
    "EXTRAS",
    "PRICE ALIGNMENT",
    "SMART",
    "HIVE",
];

/// Strip the trailing `0` layout artifact from a heading line.
pub fn clean_heading(text: &str) -> &str {
    text.trim().trim_end_matches('0').trim()
}

/// Whether `text` contains any heading keyword.
pub fn has_heading_keyword(text: &str) -> bool {
    let lower = text.to_lowercase();
    HEADING_KEYWORDS
        .iter()
        .any(|keyword| lower.contains(&keyword.to_lowercase()))
}

/// Whether a cleaned heading label names a top-level section.
pub fn is_major_section(label: &str) -> bool {
    let upper = label.to_uppercase();
    MAJOR_SECTION_MARKERS
        .iter()
        .any(|marker| upper.contains(marker))
}
