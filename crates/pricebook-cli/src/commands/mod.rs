//! CLI subcommands.

pub mod batch;
pub mod config;
pub mod parse;
pub mod rules;

use std::path::Path;

use tracing::debug;

use pricebook_core::PricebookConfig;

/// Load the config file given with `--config`, else the default config file
/// if one exists, else the built-in defaults.
pub fn load_config(config_path: Option<&str>) -> anyhow::Result<PricebookConfig> {
    if let Some(path) = config_path {
        return Ok(PricebookConfig::from_file(Path::new(path))?);
    }

    let default_path = config::default_config_path();
    if default_path.exists() {
        debug!("Using config file {}", default_path.display());
        return Ok(PricebookConfig::from_file(&default_path)?);
    }

    Ok(PricebookConfig::default())
}
