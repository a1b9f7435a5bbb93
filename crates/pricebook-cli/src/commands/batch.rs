//! Batch processing command for multiple price lists.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use clap::Args;
use console::style;
use glob::glob;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{error, warn};

use pricebook_core::models::record::PartitionSummary;

use super::parse::{process_file, write_outputs};

/// Arguments for the batch command.
#[derive(Args)]
pub struct BatchArgs {
    /// Input files or glob pattern
    #[arg(required = true)]
    input: String,

    /// Output directory; each input gets a subdirectory named after its file stem
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Resolve sections first, then parse rows in parallel
    #[arg(long)]
    parallel: bool,

    /// Also generate a batch summary CSV
    #[arg(long)]
    summary: bool,

    /// Continue on error
    #[arg(long)]
    continue_on_error: bool,
}

/// Result of processing a single file.
struct ProcessResult {
    path: PathBuf,
    summary: Option<PartitionSummary>,
    error: Option<String>,
    processing_time_ms: u64,
}

pub async fn run(args: BatchArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();

    let mut config = super::load_config(config_path)?;
    config.classification.parallel |= args.parallel;
    config.output.sample_rows = 0;

    // Expand glob pattern
    let files: Vec<PathBuf> = glob(&args.input)?
        .filter_map(|r| r.ok())
        .filter(|p| {
            let ext = p.extension().and_then(|e| e.to_str()).unwrap_or("");
            matches!(ext.to_lowercase().as_str(), "pdf" | "txt" | "text")
        })
        .collect();

    if files.is_empty() {
        anyhow::bail!("No matching files found for pattern: {}", args.input);
    }

    println!(
        "{} Found {} files to process",
        style("ℹ").blue(),
        files.len()
    );

    let output_root = args.output_dir.clone().unwrap_or_else(|| config.output.dir.clone());
    fs::create_dir_all(&output_root)?;

    let overall_pb = ProgressBar::new(files.len() as u64);
    overall_pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} files")
            .unwrap()
            .progress_chars("=>-"),
    );
    // Per-file progress is not drawn in batch mode
    let file_pb = ProgressBar::hidden();

    let mut results = Vec::with_capacity(files.len());

    for path in files {
        let file_start = Instant::now();

        let mut file_config = config.clone();
        file_config.output.dir = output_root.join(file_stem(&path));

        let result = process_file(&path, &file_config, &file_pb)
            .and_then(|partitions| {
                write_outputs(&partitions, &file_config)?;
                Ok(partitions.summary())
            });

        let processing_time_ms = file_start.elapsed().as_millis() as u64;

        match result {
            Ok(summary) => {
                results.push(ProcessResult {
                    path: path.clone(),
                    summary: Some(summary),
                    error: None,
                    processing_time_ms,
                });
            }
            Err(e) => {
                let error_msg = e.to_string();
                if args.continue_on_error {
                    warn!("Failed to process {}: {}", path.display(), error_msg);
                    results.push(ProcessResult {
                        path: path.clone(),
                        summary: None,
                        error: Some(error_msg),
                        processing_time_ms,
                    });
                } else {
                    error!("Failed to process {}: {}", path.display(), error_msg);
                    anyhow::bail!("Processing failed: {}", error_msg);
                }
            }
        }

        overall_pb.inc(1);
    }

    overall_pb.finish_with_message("Complete");

    if args.summary || config.output.write_summary {
        let summary_path = output_root.join("batch_summary.csv");
        write_batch_summary(&summary_path, &results)?;
        println!(
            "{} Summary written to {}",
            style("✓").green(),
            summary_path.display()
        );
    }

    let successful: Vec<_> = results.iter().filter(|r| r.summary.is_some()).collect();
    let failed: Vec<_> = results.iter().filter(|r| r.error.is_some()).collect();
    let total_records: usize = successful
        .iter()
        .filter_map(|r| r.summary.as_ref())
        .map(|s| s.total_records)
        .sum();

    println!();
    println!(
        "{} Processed {} files in {:?}",
        style("✓").green(),
        results.len(),
        start.elapsed()
    );
    println!(
        "   {} successful, {} failed, {} rows extracted",
        style(successful.len()).green(),
        style(failed.len()).red(),
        total_records
    );

    for result in &successful {
        if let Some(summary) = result.summary.as_ref().filter(|s| s.has_unclassified()) {
            println!(
                "   {} {}: {} rows could not be classified",
                style("⚠").yellow(),
                result.path.display(),
                summary.unclassified
            );
        }
    }

    if !failed.is_empty() {
        println!();
        println!("{}", style("Failed files:").red());
        for result in &failed {
            println!(
                "  - {}: {}",
                result.path.display(),
                result.error.as_deref().unwrap_or("unknown error")
            );
        }
    }

    Ok(())
}

fn file_stem(path: &Path) -> String {
    path.file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("pricebook")
        .to_string()
}

fn write_batch_summary(path: &Path, results: &[ProcessResult]) -> anyhow::Result<()> {
    let mut wtr = csv::Writer::from_path(path)?;

    wtr.write_record([
        "filename",
        "status",
        "total_records",
        "partitions",
        "unclassified",
        "processing_time_ms",
        "error",
    ])?;

    for result in results {
        let filename = result.path.file_name()
            .and_then(|s| s.to_str())
            .unwrap_or("");

        if let Some(summary) = &result.summary {
            wtr.write_record([
                filename,
                "success",
                &summary.total_records.to_string(),
                &summary.partitions.len().to_string(),
                &summary.unclassified.to_string(),
                &result.processing_time_ms.to_string(),
                "",
            ])?;
        } else {
            wtr.write_record([
                filename,
                "error",
                "",
                "",
                "",
                &result.processing_time_ms.to_string(),
                result.error.as_deref().unwrap_or(""),
            ])?;
        }
    }

    wtr.flush()?;
    Ok(())
}
