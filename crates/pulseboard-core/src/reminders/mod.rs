//! Reminder hit detection and at-most-once dispatch
//!
//! Detection is pure: [`collect_reminder_hits`] looks at each active
//! subscription's stored next billing date and reports which configured lead
//! times fall on `today`. Dispatch then claims each hit's [`ReminderKey`] in a
//! [`ReminderStore`] so the same reminder is surfaced once per key, no matter
//! how many times the detector runs that day.

mod memory;
mod sqlite;

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::calendar::{self, days_between, format_iso_date};
use crate::error::Result;
use crate::models::Subscription;

pub use memory::MemoryReminderStore;
pub use sqlite::SqliteReminderStore;

const KEY_PREFIX: &str = "pulseboard-reminder";

/// A subscription whose reminder is due today
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReminderHit {
    pub subscription_id: String,
    pub subscription_name: String,
    #[serde(with = "calendar::iso_date")]
    pub next_billing_date: NaiveDate,
    /// Matched lead time; 0 means the renewal is today
    pub days_before: u32,
}

impl ReminderHit {
    pub fn new(subscription: &Subscription, days_before: u32) -> Self {
        Self {
            subscription_id: subscription.id.clone(),
            subscription_name: subscription.name.clone(),
            next_billing_date: subscription.next_billing_date,
            days_before,
        }
    }

    /// Notification body, e.g. "Netflix renews in 3 days."
    pub fn message(&self) -> String {
        let name = &self.subscription_name;
        match self.days_before {
            0 => format!("{} renews today.", name),
            1 => format!("{} renews in 1 day.", name),
            n => format!("{} renews in {} days.", name, n),
        }
    }

    pub fn key(&self, today: NaiveDate) -> ReminderKey {
        ReminderKey {
            subscription_id: self.subscription_id.clone(),
            next_billing_date: self.next_billing_date,
            days_before: self.days_before,
            today,
        }
    }
}

/// Identity of one reminder firing
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ReminderKey {
    pub subscription_id: String,
    pub next_billing_date: NaiveDate,
    pub days_before: u32,
    pub today: NaiveDate,
}

impl fmt::Display for ReminderKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}:{}:{}:{}",
            KEY_PREFIX,
            self.subscription_id,
            format_iso_date(self.next_billing_date),
            self.days_before,
            format_iso_date(self.today)
        )
    }
}

/// Persistent record of which reminders have already fired
pub trait ReminderStore: Send + Sync {
    fn has_fired(&self, key: &ReminderKey) -> Result<bool>;

    fn mark_fired(&self, key: &ReminderKey) -> Result<()>;

    /// Atomically mark `key` as fired.
    ///
    /// Returns `true` only for the one caller that moved the key from unfired
    /// to fired; every later or concurrent caller gets `false`.
    fn claim(&self, key: &ReminderKey) -> Result<bool>;
}

/// Find every reminder due on `today`.
///
/// A renewal that falls on `today` always yields one hit with `days_before = 0`,
/// whatever lead times are configured. Otherwise each configured lead time
/// equal to the days remaining yields a hit, so duplicated lead times produce
/// duplicated hits (dispatch collapses them).
pub fn collect_reminder_hits(subscriptions: &[Subscription], today: NaiveDate) -> Vec<ReminderHit> {
    let mut hits = Vec::new();

    for sub in subscriptions.iter().filter(|s| s.is_active) {
        let days_left = days_between(sub.next_billing_date, today);
        if days_left == 0 {
            hits.push(ReminderHit::new(sub, 0));
            continue;
        }

        for &days_before in &sub.reminder_days_before {
            if i64::from(days_before) == days_left {
                hits.push(ReminderHit::new(sub, days_before));
            }
        }
    }

    hits
}

/// Claim the hit's key; `true` means the caller should surface it now
pub fn should_dispatch<S>(store: &S, hit: &ReminderHit, today: NaiveDate) -> Result<bool>
where
    S: ReminderStore + ?Sized,
{
    store.claim(&hit.key(today))
}

/// Detect today's reminders and return only those not surfaced before
pub fn dispatch_due<S>(
    subscriptions: &[Subscription],
    today: NaiveDate,
    store: &S,
) -> Result<Vec<ReminderHit>>
where
    S: ReminderStore + ?Sized,
{
    let candidates = collect_reminder_hits(subscriptions, today);
    let candidate_count = candidates.len();

    let mut due = Vec::new();
    for hit in candidates {
        if should_dispatch(store, &hit, today)? {
            due.push(hit);
        }
    }

    debug!(
        today = %today,
        candidates = candidate_count,
        dispatched = due.len(),
        "Reminder dispatch complete"
    );
    Ok(due)
}
