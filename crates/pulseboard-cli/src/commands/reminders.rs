//! Reminder command implementation

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use pulseboard_core::calendar::{format_iso_date, parse_iso_date};
use pulseboard_core::reminders::{
    collect_reminder_hits, dispatch_due, ReminderHit, ReminderStore, SqliteReminderStore,
};
use serde::Serialize;
use tracing::info;

use super::{print_json, Session};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ReminderRow<'a> {
    #[serde(flatten)]
    hit: &'a ReminderHit,
    message: String,
    already_sent: bool,
}

fn resolve_db_path(session: &Session, db: Option<&Path>) -> Result<PathBuf> {
    match db {
        Some(path) => Ok(path.to_path_buf()),
        None => session
            .config
            .reminder_db_path()
            .context("Failed to resolve reminder database path"),
    }
}

fn open_store(path: &Path) -> Result<SqliteReminderStore> {
    SqliteReminderStore::open(path)
        .with_context(|| format!("Failed to open reminder store {}", path.display()))
}

/// Surface today's reminders, recording each so it never fires twice.
///
/// With `dry_run`, hits are listed with their recorded state but nothing is
/// written (and a missing marker database is not created). `prune_before`
/// drops markers recorded before that date once dispatch is done.
pub fn cmd_reminders(
    session: &Session,
    db: Option<&Path>,
    dry_run: bool,
    prune_before: Option<&str>,
) -> Result<Vec<ReminderHit>> {
    let db_path = resolve_db_path(session, db)?;
    let prune_cutoff = prune_before
        .map(|raw| parse_iso_date(raw).with_context(|| format!("Invalid --prune-before: {}", raw)))
        .transpose()?;
    let subs = &session.snapshot.subscriptions;

    let results: Vec<(ReminderHit, bool)> = if dry_run {
        let hits = collect_reminder_hits(subs, session.today);
        let store = if db_path.exists() {
            Some(open_store(&db_path)?)
        } else {
            None
        };

        let mut rows = Vec::with_capacity(hits.len());
        for hit in hits {
            let already_sent = match &store {
                Some(store) => store.has_fired(&hit.key(session.today))?,
                None => false,
            };
            rows.push((hit, already_sent));
        }
        rows
    } else {
        let store = open_store(&db_path)?;
        let due = dispatch_due(subs, session.today, &store).context("Reminder dispatch failed")?;
        info!(dispatched = due.len(), store = %db_path.display(), "Reminders dispatched");

        if let Some(cutoff) = prune_cutoff {
            let removed = store
                .prune_before(cutoff)
                .context("Failed to prune reminder markers")?;
            info!(removed, cutoff = %cutoff, "Old reminder markers pruned");
        }
        due.into_iter().map(|hit| (hit, false)).collect()
    };

    if session.json {
        let rows: Vec<ReminderRow> = results
            .iter()
            .map(|(hit, already_sent)| ReminderRow {
                hit,
                message: hit.message(),
                already_sent: *already_sent,
            })
            .collect();
        print_json(&rows)?;
    } else if results.is_empty() {
        println!("No reminders due {}.", format_iso_date(session.today));
    } else {
        println!();
        if dry_run {
            println!("🔔 Reminders due {} (dry run)", format_iso_date(session.today));
        } else {
            println!("🔔 Reminders for {}", format_iso_date(session.today));
        }
        println!("   ─────────────────────────────────────────");
        for (hit, already_sent) in &results {
            if *already_sent {
                println!("   {} (already sent)", hit.message());
            } else {
                println!("   {}", hit.message());
            }
        }
        println!();
    }

    Ok(results.into_iter().map(|(hit, _)| hit).collect())
}
