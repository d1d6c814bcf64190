//! Pulseboard CLI - Subscription spend forecasting and renewal reminders
//!
//! Usage:
//!   pulseboard --file subs.json summary         Top-line numbers
//!   pulseboard --file subs.json trend --csv     Monthly projection as CSV
//!   pulseboard --file subs.json reminders       Surface today's reminders once
//!   pulseboard --file subs.json ics --id sub_1  Export a renewal calendar

mod cli;
mod commands;

#[cfg(test)]
mod tests;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cli::*;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging
    // Priority: RUST_LOG env var > --verbose flag > default (info)
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).compact().with_writer(std::io::stderr))
        .init();

    let file = cli.file.as_deref();
    let config = cli.config.as_deref();
    let today = cli.today.as_deref();
    let json = cli.json;
    let session = || commands::Session::open(file, today, config, json);

    match cli.command {
        Commands::Summary => commands::cmd_summary(&session()?),
        Commands::Trend { months, csv } => commands::cmd_trend(&session()?, months, csv),
        Commands::Categories => commands::cmd_categories(&session()?),
        Commands::Buckets { days } => commands::cmd_buckets(&session()?, days),
        Commands::Upcoming { window } => commands::cmd_upcoming(&session()?, window),
        Commands::Reminders {
            db,
            dry_run,
            prune_before,
        } => commands::cmd_reminders(&session()?, db.as_deref(), dry_run, prune_before.as_deref())
            .map(|_| ()),
        Commands::Ics { id, output } => commands::cmd_ics(&session()?, &id, output.as_deref()),
        Commands::Validate => commands::cmd_validate(file, json),
        Commands::Config => commands::cmd_config(config, json),
    }
}
