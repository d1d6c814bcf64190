//! SQLite-backed reminder store with connection pooling

use std::path::{Path, PathBuf};
use std::time::Duration;

use r2d2::{Pool, PooledConnection};
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::params;
use tracing::info;

use super::{ReminderKey, ReminderStore};
use crate::calendar::format_iso_date;
use crate::error::Result;

pub type MarkerPool = Pool<SqliteConnectionManager>;
pub type MarkerConn = PooledConnection<SqliteConnectionManager>;

/// Fired-reminder markers persisted in a SQLite file.
///
/// The marker key is the table's primary key, so `claim` is a single
/// `INSERT OR IGNORE`: the database decides which caller wins.
#[derive(Clone)]
pub struct SqliteReminderStore {
    pool: MarkerPool,
    db_path: PathBuf,
}

impl SqliteReminderStore {
    /// Open (or create) the marker database at `path`
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        // Concurrent claims on separate connections wait instead of failing with SQLITE_BUSY
        let manager = SqliteConnectionManager::file(path).with_init(|conn| {
            conn.busy_timeout(Duration::from_secs(5))?;
            Ok(())
        });
        let pool = Pool::builder().max_size(8).build(manager)?;

        let store = Self {
            pool,
            db_path: path.to_path_buf(),
        };
        store.run_migrations()?;

        info!(path = %store.db_path.display(), "Reminder store opened");
        Ok(store)
    }

    /// Create a throwaway store (for testing)
    ///
    /// Uses a temporary file rather than `:memory:` so every pooled
    /// connection sees the same database.
    pub fn in_memory() -> Result<Self> {
        use std::sync::atomic::{AtomicU64, Ordering};
        static COUNTER: AtomicU64 = AtomicU64::new(0);

        let id = COUNTER.fetch_add(1, Ordering::SeqCst);
        let path = std::env::temp_dir().join(format!(
            "pulseboard_reminders_{}_{}.db",
            std::process::id(),
            id
        ));

        // Remove any existing file
        let _ = std::fs::remove_file(&path);

        Self::open(path)
    }

    pub fn path(&self) -> &Path {
        &self.db_path
    }

    pub fn conn(&self) -> Result<MarkerConn> {
        Ok(self.pool.get()?)
    }

    /// Number of recorded markers
    pub fn marker_count(&self) -> Result<u64> {
        let conn = self.conn()?;
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM reminder_markers", [], |row| row.get(0))?;
        Ok(count.max(0) as u64)
    }

    /// Delete markers whose `today` is before `cutoff`. Returns rows removed.
    pub fn prune_before(&self, cutoff: chrono::NaiveDate) -> Result<usize> {
        let conn = self.conn()?;
        let removed = conn.execute(
            "DELETE FROM reminder_markers WHERE fired_on < ?",
            params![format_iso_date(cutoff)],
        )?;
        Ok(removed)
    }

    fn run_migrations(&self) -> Result<()> {
        let conn = self.conn()?;

        conn.execute_batch(
            r#"
            -- WAL: readers don't block the writer claiming a marker
            PRAGMA journal_mode = WAL;
            PRAGMA synchronous = NORMAL;

            CREATE TABLE IF NOT EXISTS reminder_markers (
                key TEXT PRIMARY KEY,
                subscription_id TEXT NOT NULL,
                next_billing_date TEXT NOT NULL,
                days_before INTEGER NOT NULL,
                fired_on TEXT NOT NULL,
                created_at DATETIME DEFAULT CURRENT_TIMESTAMP
            );

            CREATE INDEX IF NOT EXISTS idx_reminder_markers_fired_on ON reminder_markers(fired_on);
            "#,
        )?;

        Ok(())
    }

    fn insert_marker(&self, key: &ReminderKey) -> Result<usize> {
        let conn = self.conn()?;
        let inserted = conn.execute(
            "INSERT OR IGNORE INTO reminder_markers
                (key, subscription_id, next_billing_date, days_before, fired_on)
             VALUES (?, ?, ?, ?, ?)",
            params![
                key.to_string(),
                key.subscription_id,
                format_iso_date(key.next_billing_date),
                key.days_before,
                format_iso_date(key.today),
            ],
        )?;
        Ok(inserted)
    }
}

impl ReminderStore for SqliteReminderStore {
    fn has_fired(&self, key: &ReminderKey) -> Result<bool> {
        let conn = self.conn()?;
        let count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM reminder_markers WHERE key = ?",
            params![key.to_string()],
            |row| row.get(0),
        )?;
        Ok(count > 0)
    }

    fn mark_fired(&self, key: &ReminderKey) -> Result<()> {
        self.insert_marker(key)?;
        Ok(())
    }

    fn claim(&self, key: &ReminderKey) -> Result<bool> {
        Ok(self.insert_marker(key)? == 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn key(today: u32) -> ReminderKey {
        ReminderKey {
            subscription_id: "sub_1".into(),
            next_billing_date: NaiveDate::from_ymd_opt(2026, 2, 13).unwrap(),
            days_before: 3,
            today: NaiveDate::from_ymd_opt(2026, 2, today).unwrap(),
        }
    }

    #[test]
    fn test_claim_is_once_per_key() {
        let store = SqliteReminderStore::in_memory().unwrap();
        assert!(!store.has_fired(&key(10)).unwrap());
        assert!(store.claim(&key(10)).unwrap());
        assert!(!store.claim(&key(10)).unwrap());
        assert!(store.has_fired(&key(10)).unwrap());

        store.mark_fired(&key(10)).unwrap();
        assert_eq!(store.marker_count().unwrap(), 1);
    }

    #[test]
    fn test_markers_survive_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("reminders.db");

        {
            let store = SqliteReminderStore::open(&path).unwrap();
            assert!(store.claim(&key(10)).unwrap());
        }

        let store = SqliteReminderStore::open(&path).unwrap();
        assert!(store.has_fired(&key(10)).unwrap());
        assert!(!store.claim(&key(10)).unwrap());
    }

    #[test]
    fn test_prune_before() {
        let store = SqliteReminderStore::in_memory().unwrap();
        store.mark_fired(&key(8)).unwrap();
        store.mark_fired(&key(10)).unwrap();

        let removed = store
            .prune_before(NaiveDate::from_ymd_opt(2026, 2, 9).unwrap())
            .unwrap();
        assert_eq!(removed, 1);
        assert_eq!(store.marker_count().unwrap(), 1);
    }

    #[test]
    fn test_concurrent_claims_succeed_once() {
        let store = SqliteReminderStore::in_memory().unwrap();
        let wins = AtomicUsize::new(0);

        std::thread::scope(|scope| {
            for _ in 0..4 {
                scope.spawn(|| {
                    if store.claim(&key(10)).unwrap() {
                        wins.fetch_add(1, Ordering::SeqCst);
                    }
                });
            }
        });

        assert_eq!(wins.load(Ordering::SeqCst), 1);
    }
}
