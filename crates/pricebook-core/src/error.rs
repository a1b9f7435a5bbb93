//! Error types for the pricebook-core library.
//!
//! Line classification, row parsing and routing never fail; malformed lines are
//! dropped as noise. Errors only arise at the edges: loading documents, loading
//! rule tables and writing partitions.

use thiserror::Error;

/// Main error type for the pricebook library.
#[derive(Error, Debug)]
pub enum PricebookError {
    /// PDF processing error.
    #[error("PDF error: {0}")]
    Pdf(#[from] PdfError),

    /// Partition rule table error.
    #[error("rule table error: {0}")]
    Rules(#[from] RuleError),

    /// JSON (de)serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),

    /// A partition sink rejected a partition.
    #[error("failed to write partition {partition}: {reason}")]
    Sink { partition: String, reason: String },
}

/// Errors related to PDF processing.
#[derive(Error, Debug)]
pub enum PdfError {
    /// Failed to open/parse the PDF file.
    #[error("failed to parse PDF: {0}")]
    Parse(String),

    /// Failed to extract text from PDF.
    #[error("failed to extract text: {0}")]
    TextExtraction(String),

    /// The PDF is encrypted and cannot be processed.
    #[error("PDF is encrypted")]
    Encrypted,

    /// The PDF is empty or has no pages.
    #[error("PDF has no pages")]
    NoPages,

    /// Invalid page number requested.
    #[error("invalid page number: {0}")]
    InvalidPage(u32),
}

/// Errors found while validating a partition rule table.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RuleError {
    /// A rule has an empty name.
    #[error("rule #{0} has an empty name")]
    EmptyName(usize),

    /// Two rules share the same name.
    #[error("duplicate rule name: {0}")]
    DuplicateName(String),

    /// A rule uses the reserved fallback partition name.
    #[error("rule name {0:?} is reserved for the fallback partition")]
    ReservedName(String),

    /// A rule has no section labels, subsection labels or keywords.
    #[error("rule {0} has no section labels, subsection labels or keywords")]
    NoMatchCriteria(String),

    /// A rule has a blank label or keyword, which would match every heading.
    #[error("rule {0} has a blank label or keyword")]
    EmptyLabel(String),
}

/// Result type for the pricebook library.
pub type Result<T> = std::result::Result<T, PricebookError>;
