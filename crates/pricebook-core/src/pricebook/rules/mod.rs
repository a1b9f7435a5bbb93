//! Declarative tables and field extractors for price-list lines.
//!
//! Vocabulary lives here as plain data so it can be tested and extended
//! without touching the classification or routing algorithms.

pub mod headings;
pub mod partitions;
pub mod patterns;
pub mod price;

pub use headings::{HEADING_KEYWORDS, MAJOR_SECTION_MARKERS, clean_heading};
pub use partitions::{PartitionRule, PartitionRuleTable};
pub use patterns::*;
pub use price::{PriceExtractor, format_gbp_amount, parse_gbp_amount};

/// Trait for field extractors.
pub trait FieldExtractor {
    /// The type of value this extractor produces.
    type Output;

    /// Extract the field from text.
    fn extract(&self, text: &str) -> Option<Self::Output>;

    /// Extract all occurrences of the field.
    fn extract_all(&self, text: &str) -> Vec<Self::Output>;
}

/// An extracted value with the text it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractionMatch<T> {
    /// Extracted value.
    pub value: T,
    /// Byte range in source text.
    pub position: Option<(usize, usize)>,
    /// Source text that was matched.
    pub source: String,
}

impl<T> ExtractionMatch<T> {
    pub fn new(value: T, source: impl Into<String>) -> Self {
        Self {
            value,
            position: None,
            source: source.into(),
        }
    }

    pub fn with_position(mut self, start: usize, end: usize) -> Self {
        self.position = Some((start, end));
        self
    }

    /// Byte offset where the match starts.
    pub fn start(&self) -> Option<usize> {
        self.position.map(|(start, _)| start)
    }
}
