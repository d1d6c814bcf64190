//! Pulseboard Core Library
//!
//! Forecasting and reminder engine for the Pulseboard subscription tracker:
//! - Calendar arithmetic on plain dates (month-end clamping, day deltas)
//! - Recurrence stepping for weekly, monthly, yearly and custom-day cycles
//! - Spend analytics: monthly trend, category shares, renewal buckets
//! - Reminder detection with at-most-once dispatch through a pluggable store
//! - ICS calendar and CSV trend export
//! - TOML configuration with embedded defaults

pub mod analytics;
pub mod calendar;
pub mod config;
pub mod error;
pub mod format;
pub mod ics;
pub mod models;
pub mod normalize;
pub mod recurrence;
pub mod reminders;

/// Shared fixtures for tests
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use analytics::{
    aggregate_by_category, bucket_renewals, build_summary, project_spend, upcoming_renewals,
    write_trend_csv, AnalyticsSummary, CategorySpendPoint, RenewalBucketLabel,
    RenewalBucketOptions, RenewalBucketPoint, SpendTrendOptions, SpendTrendPoint,
};
pub use config::{Config, ConfigSource};
pub use error::{Error, Result};
pub use models::{
    validate_all, AppSettings, BillingCycle, Category, IntervalDays, Subscription,
    SubscriptionSnapshot,
};
pub use recurrence::{next_charge_date, Occurrences};
pub use reminders::{
    collect_reminder_hits, dispatch_due, should_dispatch, MemoryReminderStore, ReminderHit,
    ReminderKey, ReminderStore, SqliteReminderStore,
};
