//! Session loading and shared command utilities
//!
//! This module contains:
//! - `resolve_today` - Parse `--today` or fall back to the local date
//! - `read_snapshot` - Read and parse a snapshot file
//! - `Session` - Everything an analysis command needs, loaded once

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::{Local, NaiveDate};
use pulseboard_core::calendar::parse_iso_date;
use pulseboard_core::{Config, ConfigSource, SubscriptionSnapshot};
use serde::Serialize;
use tracing::debug;

/// `--today` when given, otherwise the local calendar date
pub fn resolve_today(arg: Option<&str>) -> Result<NaiveDate> {
    match arg {
        Some(raw) => parse_iso_date(raw).context("Invalid --today date (use YYYY-MM-DD)"),
        None => Ok(Local::now().date_naive()),
    }
}

/// Read a snapshot file without validating its records
pub fn read_snapshot(path: Option<&Path>) -> Result<SubscriptionSnapshot> {
    let path = path.context("No snapshot given. Pass --file <snapshot.json> or set PULSEBOARD_FILE")?;
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read snapshot {}", path.display()))?;
    SubscriptionSnapshot::from_json(&content)
        .with_context(|| format!("Failed to parse snapshot {}", path.display()))
}

pub fn load_config(path: Option<&Path>) -> Result<(Config, ConfigSource)> {
    Config::load(path).context("Failed to load configuration")
}

/// Loaded inputs shared by the analysis commands
pub struct Session {
    pub snapshot: SubscriptionSnapshot,
    pub today: NaiveDate,
    pub config: Config,
    pub json: bool,
}

impl Session {
    /// Load config and snapshot, validate the snapshot and resolve today
    pub fn open(
        file: Option<&Path>,
        today: Option<&str>,
        config_path: Option<&Path>,
        json: bool,
    ) -> Result<Self> {
        let (config, source) = load_config(config_path)?;
        let snapshot = read_snapshot(file)?;
        snapshot.validate().context("Snapshot contains invalid subscriptions")?;
        let today = resolve_today(today)?;

        debug!(
            config = %source,
            subscriptions = snapshot.subscriptions.len(),
            today = %today,
            "Session opened"
        );

        Ok(Self {
            snapshot,
            today,
            config,
            json,
        })
    }

    /// Currency for rendering totals: snapshot settings, else config default
    pub fn currency(&self) -> &str {
        match &self.snapshot.settings {
            Some(settings) => settings.default_currency.as_str(),
            None if self.snapshot.subscriptions.is_empty() => self.config.defaults.currency.as_str(),
            None => self.snapshot.currency(),
        }
    }
}

/// Pretty-print any serializable value as JSON on stdout
pub fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value).context("Failed to serialize output")?;
    println!("{}", json);
    Ok(())
}
