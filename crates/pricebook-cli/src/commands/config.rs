//! Config command - manage the pricebook configuration file.

use std::fs;
use std::path::{Path, PathBuf};

use clap::{Args, Subcommand};
use console::style;
use serde_json::Value;

use pricebook_core::{PartitionRuleTable, PricebookConfig};

/// Arguments for the config command.
#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    command: ConfigCommand,
}

#[derive(Subcommand)]
enum ConfigCommand {
    /// Show current configuration
    Show,

    /// Initialize a new configuration file
    Init(InitArgs),

    /// Get a specific configuration value
    Get {
        /// Configuration key (e.g., "classification.parallel")
        key: String,
    },

    /// Set a configuration value
    Set {
        /// Configuration key
        key: String,
        /// New value (JSON, or a bare string)
        value: String,
    },

    /// Show configuration file path
    Path,
}

#[derive(Args)]
struct InitArgs {
    /// Output path for configuration file
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Also export the built-in rule table next to the config and point to it
    #[arg(long)]
    with_rules: bool,

    /// Overwrite existing files
    #[arg(long)]
    force: bool,
}

pub async fn run(args: ConfigArgs) -> anyhow::Result<()> {
    match args.command {
        ConfigCommand::Show => show_config(),
        ConfigCommand::Init(init_args) => init_config(init_args),
        ConfigCommand::Get { key } => get_config(&key),
        ConfigCommand::Set { key, value } => set_config(&key, &value),
        ConfigCommand::Path => show_path(),
    }
}

/// Location of the user's config file.
pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("pricebook")
        .join("config.json")
}

fn load_or_default(path: &Path) -> anyhow::Result<PricebookConfig> {
    if path.exists() {
        Ok(PricebookConfig::from_file(path)?)
    } else {
        Ok(PricebookConfig::default())
    }
}

fn show_config() -> anyhow::Result<()> {
    let config_path = default_config_path();
    if !config_path.exists() {
        println!(
            "{} No config file found, showing defaults.",
            style("ℹ").blue()
        );
    }

    let config = load_or_default(&config_path)?;
    println!("{}", serde_json::to_string_pretty(&config)?);

    Ok(())
}

fn init_config(args: InitArgs) -> anyhow::Result<()> {
    let output_path = args.output.unwrap_or_else(default_config_path);

    if output_path.exists() && !args.force {
        anyhow::bail!(
            "Config file already exists at {}. Use --force to overwrite.",
            output_path.display()
        );
    }

    let parent = output_path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    fs::create_dir_all(parent)?;

    let mut config = PricebookConfig::default();

    if args.with_rules {
        let rules_path = parent.join("rules.json");
        if rules_path.exists() && !args.force {
            anyhow::bail!(
                "Rules file already exists at {}. Use --force to overwrite.",
                rules_path.display()
            );
        }
        fs::write(&rules_path, PartitionRuleTable::builtin().to_json_pretty()?)?;
        println!(
            "{} Exported built-in rules to {}",
            style("✓").green(),
            rules_path.display()
        );
        // Stored absolute so the config works from any directory
        config.classification.rules_file = Some(fs::canonicalize(&rules_path)?);
    }

    config.save(&output_path)?;

    println!(
        "{} Created configuration file at {}",
        style("✓").green(),
        output_path.display()
    );

    Ok(())
}

fn get_config(key: &str) -> anyhow::Result<()> {
    let config = load_or_default(&default_config_path())?;
    let json = serde_json::to_value(&config)?;

    let value = key
        .split('.')
        .try_fold(&json, |current, part| current.get(part))
        .ok_or_else(|| anyhow::anyhow!("Configuration key not found: {}", key))?;

    println!("{}", serde_json::to_string_pretty(value)?);

    Ok(())
}

fn set_config(key: &str, value: &str) -> anyhow::Result<()> {
    let config_path = default_config_path();
    let config = load_or_default(&config_path)?;

    // Values that are not valid JSON are taken as strings (e.g. paths)
    let parsed_value: Value =
        serde_json::from_str(value).unwrap_or_else(|_| Value::String(value.to_string()));

    let mut json = serde_json::to_value(&config)?;
    set_path(&mut json, key, parsed_value.clone())?;

    // Round-trip through the typed config so bad keys or types are rejected
    let config: PricebookConfig = serde_json::from_value(json)
        .map_err(|e| anyhow::anyhow!("Invalid value for {}: {}", key, e))?;

    if let Some(parent) = config_path.parent() {
        fs::create_dir_all(parent)?;
    }
    config.save(&config_path)?;

    println!(
        "{} Set {} = {}",
        style("✓").green(),
        key,
        serde_json::to_string(&parsed_value)?
    );

    Ok(())
}

/// Set a dotted key inside a JSON object tree. Every parent must already exist.
fn set_path(json: &mut Value, key: &str, value: Value) -> anyhow::Result<()> {
    let (parents, last) = match key.rsplit_once('.') {
        Some((parents, last)) => (Some(parents), last),
        None => (None, key),
    };

    let mut current = json;
    for part in parents.into_iter().flat_map(|p| p.split('.')) {
        current = current
            .get_mut(part)
            .ok_or_else(|| anyhow::anyhow!("Configuration path not found: {}", key))?;
    }

    let obj = current
        .as_object_mut()
        .ok_or_else(|| anyhow::anyhow!("Cannot set value at non-object path: {}", key))?;
    if !obj.contains_key(last) {
        anyhow::bail!("Configuration key not found: {}", key);
    }
    obj.insert(last.to_string(), value);

    Ok(())
}

fn show_path() -> anyhow::Result<()> {
    let config_path = default_config_path();

    println!("Configuration file: {}", config_path.display());

    if config_path.exists() {
        println!("Status: {}", style("exists").green());
    } else {
        println!("Status: {}", style("not created").yellow());
        println!();
        println!("Run 'pricebook config init' to create a configuration file.");
    }

    Ok(())
}
