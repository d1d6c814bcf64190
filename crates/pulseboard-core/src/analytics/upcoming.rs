//! Upcoming-renewal window filter

use chrono::NaiveDate;

use crate::calendar::days_between;
use crate::models::Subscription;

/// Default window for "renews soon" listings
pub const DEFAULT_UPCOMING_WINDOW_DAYS: i64 = 30;

/// Active subscriptions whose next billing date falls within
/// `[from, from + window_days]`, soonest first.
///
/// Ties on date are ordered by name, then id.
pub fn upcoming_renewals<'a>(
    subscriptions: &'a [Subscription],
    from: NaiveDate,
    window_days: i64,
) -> Vec<&'a Subscription> {
    let mut upcoming: Vec<&Subscription> = subscriptions
        .iter()
        .filter(|s| s.is_active)
        .filter(|s| {
            let delta = days_between(s.next_billing_date, from);
            (0..=window_days).contains(&delta)
        })
        .collect();

    upcoming.sort_by(|a, b| {
        a.next_billing_date
            .cmp(&b.next_billing_date)
            .then_with(|| a.name.cmp(&b.name))
            .then_with(|| a.id.cmp(&b.id))
    });
    upcoming
}
