//! Price record and partition models.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Name of the fallback partition for records no rule matched.
pub const UNCLASSIFIED: &str = "unclassified";

/// A single line of document text, in reading order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawLine {
    /// Trimmed line text.
    pub text: String,

    /// Position in the overall document (0-based).
    pub position: usize,

    /// Page the line was read from (1-based), if known.
    pub page: Option<u32>,
}

impl RawLine {
    /// Create a line, trimming surrounding whitespace.
    pub fn new(text: &str, position: usize) -> Self {
        Self {
            text: text.trim().to_string(),
            position,
            page: None,
        }
    }

    /// Attach the source page number.
    pub fn on_page(mut self, page: u32) -> Self {
        self.page = Some(page);
        self
    }

    /// Number lines of plain text in order.
    pub fn from_text(text: &str) -> Vec<RawLine> {
        text.lines()
            .enumerate()
            .map(|(position, line)| RawLine::new(line, position))
            .collect()
    }
}

/// Current position in the section hierarchy.
///
/// Both fields start empty and change only when a heading is read.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectionState {
    /// Most recent top-level section heading.
    pub current_section: String,

    /// Most recent subsection heading within the current section.
    pub current_subsection: String,
}

impl SectionState {
    pub fn new(section: impl Into<String>, subsection: impl Into<String>) -> Self {
        Self {
            current_section: section.into(),
            current_subsection: subsection.into(),
        }
    }
}

/// A priced item parsed from one row of the price list.
///
/// Field names double as the CSV column names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceRecord {
    /// Section heading in effect when the row was read.
    pub section: String,

    /// Subsection heading in effect when the row was read.
    pub subsection: String,

    /// Component identifier (e.g. `AB123`).
    pub component_id: String,

    /// Item description.
    pub description: String,

    /// Selling price in pounds sterling. Always positive.
    pub selling_price_gbp: Decimal,

    /// Lead time in days (0 when the row has none).
    pub lead_time_days: u32,
}

/// Records grouped by partition name.
///
/// Records keep document order within a partition; partitions iterate by name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Partitions {
    inner: BTreeMap<String, Vec<PriceRecord>>,
}

impl Partitions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a record to the named partition.
    pub fn push(&mut self, partition: &str, record: PriceRecord) {
        match self.inner.get_mut(partition) {
            Some(records) => records.push(record),
            None => {
                self.inner.insert(partition.to_string(), vec![record]);
            }
        }
    }

    /// Append another set of partitions, keeping `other` after `self`.
    pub fn extend(&mut self, other: Partitions) {
        for (name, records) in other.inner {
            self.inner.entry(name).or_default().extend(records);
        }
    }

    /// Records of a partition, if it has any.
    pub fn get(&self, partition: &str) -> Option<&[PriceRecord]> {
        self.inner.get(partition).map(Vec::as_slice)
    }

    /// Iterate over `(name, records)` in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[PriceRecord])> {
        self.inner
            .iter()
            .map(|(name, records)| (name.as_str(), records.as_slice()))
    }

    /// Partition names in name order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.inner.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Total number of records across all partitions.
    pub fn total_records(&self) -> usize {
        self.inner.values().map(Vec::len).sum()
    }

    /// Number of records no rule could classify.
    pub fn unclassified_count(&self) -> usize {
        self.inner.get(UNCLASSIFIED).map_or(0, Vec::len)
    }

    /// Counts for reporting.
    pub fn summary(&self) -> PartitionSummary {
        PartitionSummary {
            total_records: self.total_records(),
            partitions: self
                .inner
                .iter()
                .map(|(name, records)| (name.clone(), records.len()))
                .collect(),
            unclassified: self.unclassified_count(),
        }
    }
}

impl IntoIterator for Partitions {
    type Item = (String, Vec<PriceRecord>);
    type IntoIter = std::collections::btree_map::IntoIter<String, Vec<PriceRecord>>;

    fn into_iter(self) -> Self::IntoIter {
        self.inner.into_iter()
    }
}

/// Record counts reported once a document has been processed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartitionSummary {
    /// Records across all partitions.
    pub total_records: usize,

    /// Records per partition, by name.
    pub partitions: BTreeMap<String, usize>,

    /// Records routed to the fallback partition.
    pub unclassified: usize,
}

impl PartitionSummary {
    /// Whether any record fell through every routing tier.
    pub fn has_unclassified(&self) -> bool {
        self.unclassified > 0
    }
}
