//! Price-list line classification and routing.
//!
//! Lines flow one at a time, in reading order, through
//! [`LineClassifier`] -> ([`SectionTracker`] | [`RowParser`] -> [`Router`])
//! and the resulting records accumulate into [`Partitions`].

mod classifier;
mod pipeline;
mod router;
mod row;
pub mod rules;
mod tracker;

pub use classifier::{LineClass, LineClassifier, MAX_HEADING_CHARS};
pub use pipeline::{LineOutcome, Pipeline, PipelineStats, SectionSpan, resolve_sections};
pub use router::{MatchTier, RouteMatch, Router};
pub use row::RowParser;
pub use tracker::{SectionChange, SectionTracker};

use crate::error::Result;
use crate::models::record::{Partitions, PriceRecord};

/// Destination for finished partitions (CSV files, databases, ...).
pub trait PartitionSink {
    /// Write every record of one partition.
    fn write_partition(&mut self, name: &str, records: &[PriceRecord]) -> Result<()>;
}

/// Hand every non-empty partition to `sink`, in name order.
///
/// Returns the number of partitions written.
pub fn write_partitions<S: PartitionSink + ?Sized>(
    partitions: &Partitions,
    sink: &mut S,
) -> Result<usize> {
    let mut written = 0;
    for (name, records) in partitions.iter() {
        if records.is_empty() {
            continue;
        }
        sink.write_partition(name, records)?;
        written += 1;
    }
    Ok(written)
}
