//! CLI argument definitions using clap
//!
//! This module contains all the clap structs and enums for parsing CLI arguments.
//! The actual command implementations are in the `commands` module.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Pulseboard - Forecast recurring charges and never miss a renewal
#[derive(Parser)]
#[command(name = "pulseboard")]
#[command(about = "Subscription spend forecasting and renewal reminders", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Subscription snapshot (JSON array or backup document)
    #[arg(short, long, global = true, env = "PULSEBOARD_FILE")]
    pub file: Option<PathBuf>,

    /// Reference date (YYYY-MM-DD); defaults to the local date
    #[arg(long, global = true, env = "PULSEBOARD_TODAY")]
    pub today: Option<String>,

    /// Config file (defaults to <data dir>/pulseboard/config.toml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Print machine-readable JSON instead of tables
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show monthly baseline, yearly forecast and renewal counts
    Summary,

    /// Project spend per calendar month
    Trend {
        /// Number of months to project (config default: 6)
        #[arg(short, long)]
        months: Option<u32>,

        /// Output CSV instead of a table
        #[arg(long)]
        csv: bool,
    },

    /// Break monthly-equivalent spend down by category
    Categories,

    /// Count renewals by how soon they fall
    Buckets {
        /// Look-ahead in days (config default: 30)
        #[arg(short, long)]
        days: Option<i64>,
    },

    /// List renewals within a window, soonest first
    Upcoming {
        /// Window in days (config default: 30)
        #[arg(short, long)]
        window: Option<i64>,
    },

    /// Surface reminders due today (each fires once)
    Reminders {
        /// Reminder marker database (overrides config)
        #[arg(long)]
        db: Option<PathBuf>,

        /// Show what would fire without recording anything
        #[arg(long)]
        dry_run: bool,

        /// Delete markers recorded before this date (YYYY-MM-DD)
        #[arg(long)]
        prune_before: Option<String>,
    },

    /// Export a subscription's renewal schedule as an iCalendar file
    Ics {
        /// Subscription id
        #[arg(long)]
        id: String,

        /// Output file (defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Check a snapshot for invalid records
    Validate,

    /// Show the resolved configuration and where it came from
    Config,
}
