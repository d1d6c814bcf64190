//! CLI command tests
//!
//! This module contains all tests for the CLI commands.

use std::fs;
use std::path::PathBuf;

use chrono::NaiveDate;
use pulseboard_core::test_utils::{fixture_today, sample_backup_json, sample_subscriptions};
use pulseboard_core::{Config, Error, SqliteReminderStore, SubscriptionSnapshot};
use tempfile::TempDir;

use crate::commands::{self, truncate, Session};

fn sample_session(json: bool) -> Session {
    Session {
        snapshot: SubscriptionSnapshot {
            settings: None,
            subscriptions: sample_subscriptions(),
        },
        today: fixture_today(),
        config: Config::default(),
        json,
    }
}

/// Write the sample backup and an empty config into a temp dir
fn write_fixture_files() -> (TempDir, PathBuf, PathBuf) {
    let dir = tempfile::tempdir().unwrap();
    let snapshot = dir.path().join("subs.json");
    let config = dir.path().join("config.toml");
    fs::write(&snapshot, sample_backup_json()).unwrap();
    fs::write(&config, "[defaults]\ntrend_months = 3\n").unwrap();
    (dir, snapshot, config)
}

// ========== Shared Utility Tests ==========

#[test]
fn test_truncate() {
    assert_eq!(truncate("Cloud Storage", 24), "Cloud Storage");
    assert_eq!(truncate("A very long subscription name", 10), "A very ...");
    assert_eq!(truncate("Café Crème Deluxe", 8), "Café ...");
}

#[test]
fn test_resolve_today() {
    assert_eq!(
        commands::resolve_today(Some("2026-02-10")).unwrap(),
        NaiveDate::from_ymd_opt(2026, 2, 10).unwrap()
    );
    assert!(commands::resolve_today(Some("02/10/2026")).is_err());
    assert!(commands::resolve_today(None).is_ok());
}

#[test]
fn test_read_snapshot_requires_file() {
    assert!(commands::read_snapshot(None).is_err());

    let dir = tempfile::tempdir().unwrap();
    assert!(commands::read_snapshot(Some(&dir.path().join("missing.json"))).is_err());
}

#[test]
fn test_session_open() {
    let (_dir, snapshot, config) = write_fixture_files();
    let session =
        Session::open(Some(&snapshot), Some("2026-02-10"), Some(&config), false).unwrap();

    assert_eq!(session.snapshot.subscriptions.len(), 5);
    assert_eq!(session.today, fixture_today());
    assert_eq!(session.config.defaults.trend_months, 3);
    assert_eq!(session.currency(), "USD");
}

#[test]
fn test_session_open_rejects_invalid_snapshot() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("subs.json");
    let mut subs = sample_subscriptions();
    subs[0].amount_minor = 0;
    fs::write(&path, serde_json::to_string(&subs).unwrap()).unwrap();

    let config = dir.path().join("config.toml");
    fs::write(&config, "").unwrap();

    assert!(Session::open(Some(&path), Some("2026-02-10"), Some(&config), false).is_err());
}

// ========== Report Command Tests ==========

#[test]
fn test_report_commands_text_and_json() {
    for json in [false, true] {
        let session = sample_session(json);
        assert!(commands::cmd_summary(&session).is_ok());
        assert!(commands::cmd_trend(&session, None, false).is_ok());
        assert!(commands::cmd_trend(&session, Some(2), true).is_ok());
        assert!(commands::cmd_categories(&session).is_ok());
        assert!(commands::cmd_buckets(&session, None).is_ok());
        assert!(commands::cmd_upcoming(&session, None).is_ok());
    }
}

#[test]
fn test_upcoming_rows() {
    let session = sample_session(false);
    let rows = commands::upcoming_rows(&session, None);

    let ids: Vec<_> = rows.iter().map(|r| r.id.as_str()).collect();
    assert_eq!(ids, vec!["custom", "weekly", "monthly"]);
    let days: Vec<_> = rows.iter().map(|r| r.days_until).collect();
    assert_eq!(days, vec![0, 1, 5]);

    // A window wide enough for the yearly renewal on 2026-04-01
    assert_eq!(commands::upcoming_rows(&session, Some(50)).len(), 4);
}

// ========== Reminder Command Tests ==========

#[test]
fn test_cmd_reminders_fire_once() {
    let dir = tempfile::tempdir().unwrap();
    let db = dir.path().join("reminders.db");
    let session = sample_session(false);

    let first = commands::cmd_reminders(&session, Some(&db), false, None).unwrap();
    let mut fired: Vec<_> = first
        .iter()
        .map(|h| (h.subscription_id.clone(), h.days_before))
        .collect();
    fired.sort();
    assert_eq!(fired, vec![("custom".to_string(), 0), ("weekly".to_string(), 1)]);

    let second = commands::cmd_reminders(&session, Some(&db), false, None).unwrap();
    assert!(second.is_empty());

    // Dry run still lists the hits without recording anything new
    let dry = commands::cmd_reminders(&sample_session(true), Some(&db), true, None).unwrap();
    assert_eq!(dry.len(), 2);
}

#[test]
fn test_cmd_reminders_dry_run_creates_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let db = dir.path().join("reminders.db");

    let hits = commands::cmd_reminders(&sample_session(false), Some(&db), true, None).unwrap();
    assert_eq!(hits.len(), 2);
    assert!(!db.exists());
}

#[test]
fn test_cmd_reminders_prune_before() {
    let dir = tempfile::tempdir().unwrap();
    let db = dir.path().join("reminders.db");

    let first = commands::cmd_reminders(&sample_session(false), Some(&db), false, None).unwrap();
    assert_eq!(first.len(), 2);

    // Next day only the weekly renewal fires; yesterday's markers are dropped
    let mut next_day = sample_session(false);
    next_day.today = NaiveDate::from_ymd_opt(2026, 2, 11).unwrap();
    let second =
        commands::cmd_reminders(&next_day, Some(&db), false, Some("2026-02-11")).unwrap();
    assert_eq!(second.len(), 1);
    assert_eq!(second[0].subscription_id, "weekly");

    let store = SqliteReminderStore::open(&db).unwrap();
    assert_eq!(store.marker_count().unwrap(), 1);
}

#[test]
fn test_cmd_reminders_rejects_bad_prune_date() {
    let dir = tempfile::tempdir().unwrap();
    let db = dir.path().join("reminders.db");
    let result = commands::cmd_reminders(&sample_session(false), Some(&db), false, Some("11/02/2026"));
    assert!(result.is_err());
}

// ========== Export Command Tests ==========

#[test]
fn test_cmd_ics_writes_file() {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("vitamins.ics");
    let session = sample_session(false);

    commands::cmd_ics(&session, "custom", Some(&output)).unwrap();

    let ics = fs::read_to_string(&output).unwrap();
    assert!(ics.starts_with("BEGIN:VCALENDAR\r\n"));
    assert!(ics.contains("UID:custom@pulseboard.local\r\n"));
    assert!(ics.contains("RRULE:FREQ=DAILY;INTERVAL=10\r\n"));
    assert!(ics.contains("DESCRIPTION:Auto-ship\\; cancel before trip\r\n"));
}

#[test]
fn test_cmd_ics_unknown_id() {
    let session = sample_session(false);
    let err = commands::cmd_ics(&session, "nope", None).unwrap_err();
    assert!(matches!(err.downcast_ref::<Error>(), Some(Error::NotFound(id)) if id == "nope"));
}

// ========== Settings Command Tests ==========

#[test]
fn test_validation_report_collects_all_errors() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("subs.json");
    let mut subs = sample_subscriptions();
    subs[0].amount_minor = 0;
    subs[1].id = subs[2].id.clone();
    fs::write(&path, serde_json::to_string(&subs).unwrap()).unwrap();

    let report = commands::validation_report(Some(&path)).unwrap();
    assert_eq!(report.total, 5);
    assert_eq!(report.errors.len(), 2);
    assert!(commands::cmd_validate(Some(&path), false).is_err());
}

#[test]
fn test_cmd_validate_ok() {
    let (_dir, snapshot, _config) = write_fixture_files();
    assert!(commands::cmd_validate(Some(&snapshot), false).is_ok());
    assert!(commands::cmd_validate(Some(&snapshot), true).is_ok());
}

#[test]
fn test_cmd_config() {
    let (_dir, _snapshot, config) = write_fixture_files();
    assert!(commands::cmd_config(Some(&config), false).is_ok());
    assert!(commands::cmd_config(Some(&config), true).is_ok());

    let dir = tempfile::tempdir().unwrap();
    assert!(commands::cmd_config(Some(&dir.path().join("missing.toml")), false).is_err());
}
