//! Partition output: CSV files and console report.

use std::fs;
use std::path::{Path, PathBuf};

use console::style;
use tracing::debug;

use pricebook_core::models::record::{PartitionSummary, Partitions, PriceRecord, UNCLASSIFIED};
use pricebook_core::pricebook::rules::format_gbp_amount;
use pricebook_core::{PartitionSink, PricebookError};

/// Description length shown in sample rows.
const SAMPLE_DESCRIPTION_CHARS: usize = 60;

/// Writes each partition to `<dir>/<partition>.csv`.
pub struct CsvSink {
    dir: PathBuf,
    written: Vec<(String, PathBuf, usize)>,
}

impl CsvSink {
    /// Create a sink, creating `dir` if needed.
    pub fn new(dir: &Path) -> anyhow::Result<Self> {
        fs::create_dir_all(dir)?;
        Ok(Self {
            dir: dir.to_path_buf(),
            written: Vec::new(),
        })
    }

    /// Path a partition is written to.
    pub fn path_for(&self, partition: &str) -> PathBuf {
        self.dir.join(format!("{}.csv", partition))
    }

    /// `(partition, path, rows)` for every file written so far.
    pub fn written(&self) -> &[(String, PathBuf, usize)] {
        &self.written
    }
}

impl PartitionSink for CsvSink {
    fn write_partition(&mut self, name: &str, records: &[PriceRecord]) -> pricebook_core::Result<()> {
        let path = self.path_for(name);
        let sink_error = |e: csv::Error| PricebookError::Sink {
            partition: name.to_string(),
            reason: e.to_string(),
        };

        let mut wtr = csv::Writer::from_path(&path).map_err(sink_error)?;
        for record in records {
            wtr.serialize(record).map_err(sink_error)?;
        }
        wtr.flush()?;

        debug!("Wrote {} rows to {}", records.len(), path.display());
        self.written.push((name.to_string(), path, records.len()));
        Ok(())
    }
}

/// Print the first `count` records of a partition.
pub fn print_samples(name: &str, records: &[PriceRecord], count: usize) {
    if count == 0 || records.is_empty() {
        return;
    }

    println!("Sample rows from {}:", name);
    for (i, record) in records.iter().take(count).enumerate() {
        println!(
            "  {}. {}: {}... {}",
            i + 1,
            record.component_id,
            truncate(&record.description, SAMPLE_DESCRIPTION_CHARS),
            format_gbp_amount(record.selling_price_gbp)
        );
    }
}

/// Print total and per-partition counts, warning about unclassified rows.
pub fn print_summary(summary: &PartitionSummary) {
    println!();
    println!("{}", style("Summary").bold());
    println!("Total rows extracted: {}", summary.total_records);
    println!();
    println!("Rows by partition:");
    for (name, count) in &summary.partitions {
        println!("  {}.csv: {} rows", name, count);
    }

    if summary.has_unclassified() {
        println!();
        println!(
            "{} {} rows could not be classified (see {}.csv)",
            style("⚠").yellow(),
            summary.unclassified,
            UNCLASSIFIED
        );
    }
}

/// Write `summary.json` into `dir`.
pub fn write_summary_json(dir: &Path, partitions: &Partitions) -> anyhow::Result<PathBuf> {
    let path = dir.join("summary.json");
    let content = serde_json::to_string_pretty(&partitions.summary())?;
    fs::write(&path, content)?;
    Ok(path)
}

fn truncate(text: &str, max_chars: usize) -> String {
    text.chars().take(max_chars).collect()
}
