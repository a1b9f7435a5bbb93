//! Configuration structures for the pricebook pipeline.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{PricebookError, Result};
use crate::pricebook::rules::PartitionRuleTable;

/// Main configuration for the pricebook pipeline.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PricebookConfig {
    /// PDF processing configuration.
    pub pdf: PdfConfig,

    /// Classification and routing configuration.
    pub classification: ClassificationConfig,

    /// Output configuration.
    pub output: OutputConfig,
}

/// PDF processing configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PdfConfig {
    /// Maximum pages to process (0 = unlimited).
    pub max_pages: usize,

    /// Skip pages that yield no text instead of failing.
    pub skip_empty_pages: bool,
}

impl Default for PdfConfig {
    fn default() -> Self {
        Self {
            max_pages: 0,
            skip_empty_pages: true,
        }
    }
}

/// Classification and routing configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassificationConfig {
    /// Resolve sections serially, then parse and route section spans in parallel.
    pub parallel: bool,

    /// JSON partition rule table replacing the built-in one.
    pub rules_file: Option<PathBuf>,
}

/// Output configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Directory partition files are written to.
    pub dir: PathBuf,

    /// Also write `summary.json` with record counts.
    pub write_summary: bool,

    /// Number of sample rows printed per partition.
    pub sample_rows: usize,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("pricebook_csvs"),
            write_summary: false,
            sample_rows: 3,
        }
    }
}

impl PricebookConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content).map_err(|e| {
            PricebookError::Config(format!("{}: {}", path.display(), e))
        })
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Rule table to route with: the configured file, or the built-in table.
    pub fn rule_table(&self) -> Result<PartitionRuleTable> {
        match &self.classification.rules_file {
            Some(path) => PartitionRuleTable::from_file(path),
            None => Ok(PartitionRuleTable::builtin()),
        }
    }
}
