//! Taxonomy command - show the active enumeration tables.

use clap::Args;
use console::style;

use super::load_config;

/// Arguments for the taxonomy command.
#[derive(Args)]
pub struct TaxonomyArgs {
    /// Show the agency table instead of trades
    #[arg(long)]
    agencies: bool,

    /// Print as JSON
    #[arg(long)]
    json: bool,
}

pub async fn run(args: TaxonomyArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let config = load_config(config_path)?;
    let taxonomy = if args.agencies {
        &config.taxonomy.agencies
    } else {
        &config.taxonomy.trades
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(taxonomy)?);
        return Ok(());
    }

    for entry in taxonomy.entries() {
        if entry.keywords.is_empty() {
            println!("{}", style(&entry.name).bold());
        } else {
            println!("{}: {}", style(&entry.name).bold(), entry.keywords.join(", "));
        }
    }

    Ok(())
}
