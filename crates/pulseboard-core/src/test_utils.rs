//! Test fixtures for pulseboard-core
//!
//! A small mixed-cycle portfolio with known forecast numbers, available to
//! this crate's unit tests and, behind the `test-utils` feature, to the CLI.

use chrono::NaiveDate;

use crate::models::{BillingCycle, Category, IntervalDays, Subscription};

/// Reference date the fixture numbers are computed against
pub fn fixture_today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 2, 10).unwrap()
}

/// Four active subscriptions, one per cycle, plus one inactive record.
///
/// From 2026-02-10 the six-month trend is
/// `[3100, 3900, 16400, 4200, 3900, 4400]`.
pub fn sample_subscriptions() -> Vec<Subscription> {
    let date = |m, d| NaiveDate::from_ymd_opt(2026, m, d).unwrap();
    vec![
        Subscription::new("monthly", "Cloud Storage", 1000, BillingCycle::Monthly, date(2, 15))
            .with_category(Category::Productivity),
        Subscription::new("weekly", "Meal Kit", 500, BillingCycle::Weekly, date(2, 11))
            .with_category(Category::Utilities),
        Subscription::new("yearly", "Password Manager", 12000, BillingCycle::Yearly, date(4, 1))
            .with_category(Category::Productivity)
            .with_reminders([7, 30]),
        Subscription::new("custom", "Vitamins", 300, BillingCycle::CustomDays, date(2, 10))
            .with_custom_interval(IntervalDays::new(10).unwrap())
            .with_category(Category::Health)
            .with_notes("Auto-ship; cancel before trip"),
        Subscription::new("paused", "Old Streaming", 1599, BillingCycle::Monthly, date(2, 12))
            .with_category(Category::Entertainment)
            .inactive(),
    ]
}

/// The sample portfolio as a version 1.0 backup document
pub fn sample_backup_json() -> String {
    serde_json::json!({
        "version": "1.0",
        "exportedAt": "2026-02-10T09:00:00.000Z",
        "settings": {
            "defaultCurrency": "USD",
            "weekStartsOn": 1,
            "notificationsEnabled": true,
            "themePreference": "dark"
        },
        "subscriptions": sample_subscriptions(),
    })
    .to_string()
}
