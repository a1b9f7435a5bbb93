//! PDF text extraction using lopdf and pdf-extract.

use lopdf::Document;
use tracing::{debug, warn};

use super::{PdfProcessor, Result};
use crate::error::PdfError;

/// PDF text extractor using lopdf.
pub struct PdfExtractor {
    document: Option<Document>,
    raw_data: Vec<u8>,
}

/// Text from a single PDF page.
#[derive(Debug, Clone)]
pub struct PdfPage {
    /// Page number (1-indexed).
    pub number: u32,
    /// Extracted text from this page.
    pub text: String,
}

impl PdfExtractor {
    /// Create a new PDF extractor.
    pub fn new() -> Self {
        Self {
            document: None,
            raw_data: Vec::new(),
        }
    }

    fn document(&self) -> Result<&Document> {
        self.document
            .as_ref()
            .ok_or_else(|| PdfError::Parse("No document loaded".to_string()))
    }

    /// Extract the text of the first `max_pages` pages (0 = all).
    ///
    /// Pages lopdf cannot decode come back empty with a warning, so one bad page
    /// does not lose the rest of the document. If no page yields any text, the
    /// pages are extracted again with pdf-extract, under the same page limit.
    pub fn extract_pages(&self, max_pages: usize) -> Result<Vec<PdfPage>> {
        let mut page_count = self.page_count();
        if page_count == 0 {
            return Err(PdfError::NoPages);
        }
        if max_pages > 0 {
            page_count = page_count.min(max_pages as u32);
        }

        let mut pages = Vec::with_capacity(page_count as usize);
        for number in 1..=page_count {
            let text = match self.extract_page_text(number) {
                Ok(text) => text,
                Err(e) => {
                    warn!("Failed to extract text from page {}: {}", number, e);
                    String::new()
                }
            };
            pages.push(PdfPage { number, text });
        }

        let total_text_len: usize = pages.iter().map(|p| p.text.len()).sum();
        debug!("Extracted {} chars from {} pages", total_text_len, page_count);

        // pdf-extract fallback when lopdf finds no text at all
        if total_text_len == 0 {
            warn!("No per-page text found, falling back to pdf-extract");
            let texts = pdf_extract::extract_text_from_mem_by_pages(&self.raw_data)
                .map_err(|e| PdfError::TextExtraction(e.to_string()))?;
            return Ok(number_pages(texts, max_pages));
        }

        Ok(pages)
    }
}

/// Number page texts from 1, keeping the first `max_pages` (0 = all).
fn number_pages(texts: Vec<String>, max_pages: usize) -> Vec<PdfPage> {
    let limit = if max_pages == 0 { usize::MAX } else { max_pages };
    texts
        .into_iter()
        .take(limit)
        .enumerate()
        .map(|(i, text)| PdfPage {
            number: i as u32 + 1,
            text,
        })
        .collect()
}

impl Default for PdfExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl PdfProcessor for PdfExtractor {
    fn load(&mut self, data: &[u8]) -> Result<()> {
        let mut doc = Document::load_mem(data).map_err(|e| PdfError::Parse(e.to_string()))?;

        // Handle PDFs with empty password encryption
        if doc.is_encrypted() {
            if doc.decrypt("").is_err() {
                return Err(PdfError::Encrypted);
            }
            debug!("Decrypted PDF with empty password");

            // Save decrypted document to raw_data for pdf_extract
            let mut decrypted_data = Vec::new();
            doc.save_to(&mut decrypted_data)
                .map_err(|e| PdfError::Parse(format!("Failed to save decrypted PDF: {}", e)))?;
            self.raw_data = decrypted_data;
        } else {
            self.raw_data = data.to_vec();
        }

        let page_count = doc.get_pages().len();
        if page_count == 0 {
            return Err(PdfError::NoPages);
        }

        debug!("Loaded PDF with {} pages", page_count);
        self.document = Some(doc);
        Ok(())
    }

    fn page_count(&self) -> u32 {
        self.document
            .as_ref()
            .map(|doc| doc.get_pages().len() as u32)
            .unwrap_or(0)
    }

    fn extract_text(&self) -> Result<String> {
        if self.raw_data.is_empty() {
            return Err(PdfError::Parse("No document loaded".to_string()));
        }
        pdf_extract::extract_text_from_mem(&self.raw_data)
            .map_err(|e| PdfError::TextExtraction(e.to_string()))
    }

    fn extract_page_text(&self, page: u32) -> Result<String> {
        let doc = self.document()?;
        if page == 0 || page > self.page_count() {
            return Err(PdfError::InvalidPage(page));
        }

        doc.extract_text(&[page])
            .map_err(|e| PdfError::TextExtraction(format!("page {}: {}", page, e)))
    }
}
