//! PDF page text extraction.

mod extractor;

pub use extractor::{PdfExtractor, PdfPage};

use crate::error::PdfError;
use crate::models::record::RawLine;

/// Result type for PDF operations.
pub type Result<T> = std::result::Result<T, PdfError>;

/// Trait for PDF processing implementations.
pub trait PdfProcessor {
    /// Load a PDF from bytes.
    fn load(&mut self, data: &[u8]) -> Result<()>;

    /// Get the number of pages in the PDF.
    fn page_count(&self) -> u32;

    /// Extract text from the entire PDF.
    fn extract_text(&self) -> Result<String>;

    /// Extract text from a specific page (1-indexed).
    fn extract_page_text(&self, page: u32) -> Result<String>;
}

/// Number the lines of extracted pages in reading order.
///
/// Positions run across the whole document; page numbers are kept on each line.
pub fn pages_to_lines(pages: &[PdfPage]) -> Vec<RawLine> {
    let mut lines = Vec::new();
    for page in pages {
        for line in page.text.lines() {
            let position = lines.len();
            lines.push(RawLine::new(line, position).on_page(page.number));
        }
    }
    lines
}
