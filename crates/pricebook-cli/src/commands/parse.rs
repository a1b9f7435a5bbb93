//! Parse command - split a single price list into partition files.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use clap::Args;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, info, warn};

use pricebook_core::models::record::{Partitions, RawLine};
use pricebook_core::pdf::{PdfExtractor, PdfProcessor, pages_to_lines};
use pricebook_core::{Pipeline, PricebookConfig, write_partitions};

use crate::output::{self, CsvSink};

/// Arguments for the parse command.
#[derive(Args)]
pub struct ParseArgs {
    /// Input file (PDF or pre-extracted text)
    #[arg(required = true)]
    input: PathBuf,

    /// Output directory for partition CSV files
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Partition rule table (JSON) to use instead of the built-in one
    #[arg(short, long)]
    rules: Option<PathBuf>,

    /// Resolve sections first, then parse rows in parallel
    #[arg(long)]
    parallel: bool,

    /// Also write summary.json with record counts
    #[arg(long)]
    summary: bool,

    /// Sample rows to print per partition
    #[arg(long)]
    samples: Option<usize>,

    /// Report counts without writing any files
    #[arg(long)]
    dry_run: bool,
}

pub async fn run(args: ParseArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();

    let mut config = super::load_config(config_path)?;
    apply_overrides(&mut config, &args);

    // Check input file exists
    if !args.input.exists() {
        anyhow::bail!("Input file not found: {}", args.input.display());
    }

    info!("Processing file: {}", args.input.display());

    // Create progress bar
    let pb = ProgressBar::new(100);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] {bar:40.cyan/blue} {msg}")
            .unwrap()
            .progress_chars("##-"),
    );

    let partitions = process_file(&args.input, &config, &pb)?;

    if args.dry_run {
        pb.finish_with_message("Done (dry run)");
    } else {
        pb.set_message("Writing partitions...");
        pb.set_position(90);
        write_outputs(&partitions, &config)?;
        pb.finish_with_message("Done");
    }

    output::print_summary(&partitions.summary());

    debug!("Total processing time: {:?}", start.elapsed());

    Ok(())
}

fn apply_overrides(config: &mut PricebookConfig, args: &ParseArgs) {
    if let Some(dir) = &args.output_dir {
        config.output.dir = dir.clone();
    }
    if let Some(rules) = &args.rules {
        config.classification.rules_file = Some(rules.clone());
    }
    if let Some(samples) = args.samples {
        config.output.sample_rows = samples;
    }
    config.classification.parallel |= args.parallel;
    config.output.write_summary |= args.summary;
}

/// Read, classify and route one input file.
pub fn process_file(
    path: &Path,
    config: &PricebookConfig,
    pb: &ProgressBar,
) -> anyhow::Result<Partitions> {
    let lines = read_lines(path, config, pb)?;
    if lines.iter().all(|line| line.text.is_empty()) {
        anyhow::bail!("No text could be extracted from {}", path.display());
    }

    pb.set_message("Classifying lines...");
    pb.set_position(60);

    let mut pipeline = Pipeline::from_config(config)?;
    pipeline.process(&lines, config.classification.parallel);

    pb.set_position(80);
    Ok(pipeline.finish())
}

/// Read the ordered lines of a PDF or plain-text file.
fn read_lines(path: &Path, config: &PricebookConfig, pb: &ProgressBar) -> anyhow::Result<Vec<RawLine>> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase();

    match extension.as_str() {
        "pdf" => read_pdf_lines(path, config, pb),
        "txt" | "text" => {
            pb.set_message("Reading text...");
            pb.set_position(30);
            Ok(RawLine::from_text(&fs::read_to_string(path)?))
        }
        _ => anyhow::bail!("Unsupported file format: {}", extension),
    }
}

fn read_pdf_lines(path: &Path, config: &PricebookConfig, pb: &ProgressBar) -> anyhow::Result<Vec<RawLine>> {
    pb.set_message("Loading PDF...");
    pb.set_position(10);

    let data = fs::read(path)?;
    let mut extractor = PdfExtractor::new();
    extractor.load(&data)?;

    let page_count = extractor.page_count();
    debug!("PDF has {} pages", page_count);

    pb.set_message(format!("Extracting text from {} pages...", page_count));
    pb.set_position(30);

    let mut pages = extractor.extract_pages(config.pdf.max_pages)?;

    let empty: Vec<u32> = pages
        .iter()
        .filter(|page| page.text.trim().is_empty())
        .map(|page| page.number)
        .collect();
    if !empty.is_empty() {
        if !config.pdf.skip_empty_pages {
            anyhow::bail!("Pages without text: {:?}", empty);
        }
        warn!("Skipping {} pages without text: {:?}", empty.len(), empty);
        pages.retain(|page| !page.text.trim().is_empty());
    }

    Ok(pages_to_lines(&pages))
}

/// Write partition CSVs (and optionally summary.json), printing samples.
pub fn write_outputs(partitions: &Partitions, config: &PricebookConfig) -> anyhow::Result<()> {
    let mut sink = CsvSink::new(&config.output.dir)?;
    write_partitions(partitions, &mut sink)?;

    for (name, path, rows) in sink.written() {
        println!();
        println!("Writing {} ({} rows)", path.display(), rows);
        if let Some(records) = partitions.get(name) {
            output::print_samples(name, records, config.output.sample_rows);
        }
    }

    if config.output.write_summary {
        let summary_path = output::write_summary_json(&config.output.dir, partitions)?;
        println!(
            "{} Summary written to {}",
            style("✓").green(),
            summary_path.display()
        );
    }

    Ok(())
}
