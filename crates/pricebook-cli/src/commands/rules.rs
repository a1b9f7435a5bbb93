//! Rules command - inspect the partition rule table.

use std::fs;
use std::path::PathBuf;

use clap::{Args, Subcommand};
use console::style;

use pricebook_core::{PartitionRuleTable, Router};

/// Arguments for the rules command.
#[derive(Args)]
pub struct RulesArgs {
    /// Partition rule table (JSON) to use instead of the configured one
    #[arg(short, long, global = true)]
    rules: Option<PathBuf>,

    #[command(subcommand)]
    command: RulesCommand,
}

#[derive(Subcommand)]
enum RulesCommand {
    /// List rules in matching order
    Show {
        /// Print the table as JSON
        #[arg(long)]
        json: bool,
    },

    /// Write the rule table to a JSON file
    Export {
        /// Output path
        #[arg(short, long, default_value = "rules.json")]
        output: PathBuf,

        /// Overwrite existing file
        #[arg(long)]
        force: bool,
    },

    /// Show which partition a section/subsection pair routes to
    Route {
        /// Section heading
        section: String,

        /// Subsection heading
        #[arg(default_value = "")]
        subsection: String,
    },
}

pub async fn run(args: RulesArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let table = match &args.rules {
        Some(path) => PartitionRuleTable::from_file(path)?,
        None => super::load_config(config_path)?.rule_table()?,
    };

    match args.command {
        RulesCommand::Show { json } => show_rules(&table, json),
        RulesCommand::Export { output, force } => export_rules(&table, output, force),
        RulesCommand::Route { section, subsection } => route(&table, &section, &subsection),
    }
}

fn show_rules(table: &PartitionRuleTable, json: bool) -> anyhow::Result<()> {
    if json {
        println!("{}", table.to_json_pretty()?);
        return Ok(());
    }

    for (i, rule) in table.rules.iter().enumerate() {
        println!("{}. {}", i + 1, style(&rule.name).bold());
        if !rule.section_labels.is_empty() {
            println!("   sections:    {}", rule.section_labels.join(" | "));
        }
        if !rule.subsection_labels.is_empty() {
            println!("   subsections: {}", rule.subsection_labels.join(" | "));
        }
        if !rule.keywords.is_empty() {
            println!("   keywords:    {}", rule.keywords.join(" | "));
        }
    }

    Ok(())
}

fn export_rules(table: &PartitionRuleTable, output: PathBuf, force: bool) -> anyhow::Result<()> {
    if output.exists() && !force {
        anyhow::bail!(
            "Rules file already exists at {}. Use --force to overwrite.",
            output.display()
        );
    }

    if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    fs::write(&output, table.to_json_pretty()?)?;

    println!(
        "{} Wrote {} rules to {}",
        style("✓").green(),
        table.len(),
        output.display()
    );

    Ok(())
}

fn route(table: &PartitionRuleTable, section: &str, subsection: &str) -> anyhow::Result<()> {
    let router = Router::new(table);
    let found = router.resolve(section, subsection);

    println!("{} ({})", found.partition, found.tier.as_str());

    Ok(())
}
