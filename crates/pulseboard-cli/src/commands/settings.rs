//! Validation and configuration command implementations

use std::collections::HashSet;
use std::path::Path;

use anyhow::Result;
use pulseboard_core::config::default_config_path;
use serde::Serialize;

use super::{load_config, print_json, read_snapshot};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationReport {
    pub total: usize,
    pub active: usize,
    pub errors: Vec<String>,
}

/// Check every record, reporting all problems rather than the first.
pub fn validation_report(file: Option<&Path>) -> Result<ValidationReport> {
    let snapshot = read_snapshot(file)?;

    let mut errors = Vec::new();
    let mut seen = HashSet::new();
    for sub in &snapshot.subscriptions {
        if let Err(e) = sub.validate() {
            errors.push(e.to_string());
        }
        if !seen.insert(sub.id.as_str()) {
            errors.push(format!("Invalid data: duplicate subscription id: {}", sub.id));
        }
    }

    Ok(ValidationReport {
        total: snapshot.subscriptions.len(),
        active: snapshot.active_count(),
        errors,
    })
}

pub fn cmd_validate(file: Option<&Path>, json: bool) -> Result<()> {
    let report = validation_report(file)?;

    if json {
        print_json(&report)?;
    } else if report.errors.is_empty() {
        println!(
            "✅ {} subscriptions valid ({} active)",
            report.total, report.active
        );
    } else {
        println!("❌ {} problem(s) found:", report.errors.len());
        for error in &report.errors {
            println!("   - {}", error);
        }
    }

    if !report.errors.is_empty() {
        anyhow::bail!("Snapshot failed validation");
    }
    Ok(())
}

pub fn cmd_config(config_path: Option<&Path>, json: bool) -> Result<()> {
    let (config, source) = load_config(config_path)?;

    if json {
        return print_json(&serde_json::json!({
            "source": source.to_string(),
            "config": config,
        }));
    }

    println!("# Source: {}", source);
    if let Some(path) = default_config_path() {
        println!("# Override path: {}", path.display());
    }
    println!();
    print!("{}", config.to_toml()?);

    Ok(())
}
