//! Line classification: heading, item row candidate, or layout noise.

use super::rules::headings::{clean_heading, has_heading_keyword};
use super::rules::patterns::{CURRENCY_SYMBOL, is_component_id};

/// Lines longer than this (in characters) are never headings.
pub const MAX_HEADING_CHARS: usize = 100;

/// What a single line of text is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineClass {
    /// Section or subsection heading.
    Heading,
    /// Possibly an item row; the row parser may still reject it.
    DataCandidate,
    /// Blank line or layout artifact.
    Skip,
}

/// Classifies trimmed lines. Rules are checked in order and the first one that
/// applies decides.
#[derive(Debug, Clone, Copy, Default)]
pub struct LineClassifier;

impl LineClassifier {
    pub fn new() -> Self {
        Self
    }

    pub fn classify(&self, line: &str) -> LineClass {
        let line = line.trim();

        // A lone "0" is a layout artifact of the source document.
        if line.is_empty() || line == "0" {
            return LineClass::Skip;
        }

        // Checked on the cleaned label: "BOILERS0" only has the identifier shape
        // because of the trailing "0" artifact.
        let label = clean_heading(line);
        if is_component_id(label) {
            return LineClass::DataCandidate;
        }

        if line.chars().count() > MAX_HEADING_CHARS || line.contains(CURRENCY_SYMBOL) {
            return LineClass::DataCandidate;
        }

        if has_heading_keyword(label) {
            LineClass::Heading
        } else {
            LineClass::DataCandidate
        }
    }

    pub fn is_heading(&self, line: &str) -> bool {
        self.classify(line) == LineClass::Heading
    }
}
