//! Core library for price-list processing.
//!
//! This crate provides:
//! - PDF page text extraction
//! - Line classification (headings, item rows, layout noise)
//! - Section/subsection tracking across the whole document
//! - Item row parsing into typed price records
//! - Tiered routing of records into named output partitions

pub mod error;
pub mod models;
pub mod pdf;
pub mod pricebook;

pub use error::{PdfError, PricebookError, Result, RuleError};
pub use models::config::PricebookConfig;
pub use models::record::{
    PartitionSummary, Partitions, PriceRecord, RawLine, SectionState, UNCLASSIFIED,
};
pub use pdf::{PdfExtractor, PdfPage, PdfProcessor, pages_to_lines};
pub use pricebook::{
    LineClass, LineClassifier, LineOutcome, MatchTier, PartitionSink, Pipeline, PipelineStats,
    RouteMatch, Router, RowParser, SectionChange, SectionTracker, write_partitions,
};
pub use pricebook::rules::{PartitionRule, PartitionRuleTable};
