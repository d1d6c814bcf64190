//! Renewal bucketer: how soon each subscription next renews

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::calendar::days_between;
use crate::models::Subscription;

/// Default look-ahead for bucketing
pub const DEFAULT_BUCKET_DAYS_AHEAD: i64 = 30;

/// Fixed renewal buckets, in display order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RenewalBucketLabel {
    #[serde(rename = "0-7 days")]
    WithinWeek,
    #[serde(rename = "8-14 days")]
    SecondWeek,
    #[serde(rename = "15-21 days")]
    ThirdWeek,
    #[serde(rename = "22-30 days")]
    Rest,
}

impl RenewalBucketLabel {
    pub const ALL: [RenewalBucketLabel; 4] =
        [Self::WithinWeek, Self::SecondWeek, Self::ThirdWeek, Self::Rest];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::WithinWeek => "0-7 days",
            Self::SecondWeek => "8-14 days",
            Self::ThirdWeek => "15-21 days",
            Self::Rest => "22-30 days",
        }
    }

    /// Bucket for a non-negative day offset. Anything past 21 lands in the last one.
    fn for_delta(delta: i64) -> Self {
        match delta {
            d if d <= 7 => Self::WithinWeek,
            d if d <= 14 => Self::SecondWeek,
            d if d <= 21 => Self::ThirdWeek,
            _ => Self::Rest,
        }
    }

    fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for RenewalBucketLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RenewalBucketPoint {
    pub bucket_label: RenewalBucketLabel,
    pub count: u32,
}

#[derive(Debug, Clone, Copy)]
pub struct RenewalBucketOptions {
    pub from: NaiveDate,
    /// Renewals further out than this are not counted
    pub days_ahead: i64,
}

impl RenewalBucketOptions {
    pub fn new(from: NaiveDate) -> Self {
        Self {
            from,
            days_ahead: DEFAULT_BUCKET_DAYS_AHEAD,
        }
    }

    pub fn with_days_ahead(mut self, days_ahead: i64) -> Self {
        self.days_ahead = days_ahead;
        self
    }
}

/// Count active subscriptions by how many days remain until their stored
/// next billing date. Only that one occurrence is considered per record.
///
/// Always returns the four buckets, in order, even when all counts are zero.
/// A `days_ahead` above 30 still folds everything past day 21 into the last
/// bucket.
pub fn bucket_renewals(
    subscriptions: &[Subscription],
    options: &RenewalBucketOptions,
) -> [RenewalBucketPoint; 4] {
    let mut buckets = RenewalBucketLabel::ALL.map(|bucket_label| RenewalBucketPoint {
        bucket_label,
        count: 0,
    });

    for sub in subscriptions.iter().filter(|s| s.is_active) {
        let delta = days_between(sub.next_billing_date, options.from);
        if delta < 0 || delta > options.days_ahead {
            continue;
        }
        buckets[RenewalBucketLabel::for_delta(delta).index()].count += 1;
    }

    debug!(from = %options.from, days_ahead = options.days_ahead, "Renewals bucketed");
    buckets
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::BillingCycle;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn sub(id: &str, next: NaiveDate) -> Subscription {
        Subscription::new(id, id, 1000, BillingCycle::Monthly, next)
    }

    fn counts(points: &[RenewalBucketPoint; 4]) -> Vec<u32> {
        points.iter().map(|p| p.count).collect()
    }

    #[test]
    fn test_fixed_buckets_in_thirty_day_window() {
        let subs = vec![
            sub("b0", date(2026, 2, 10)),
            sub("b1", date(2026, 2, 18)),
            sub("b2", date(2026, 2, 25)),
            sub("b3", date(2026, 3, 11)),
            sub("inactive", date(2026, 2, 12)).inactive(),
            sub("outside", date(2026, 3, 20)),
        ];

        let buckets = bucket_renewals(&subs, &RenewalBucketOptions::new(date(2026, 2, 10)));
        assert_eq!(counts(&buckets), vec![1, 1, 1, 1]);
    }

    #[test]
    fn test_empty_input_returns_four_zero_buckets() {
        let buckets = bucket_renewals(&[], &RenewalBucketOptions::new(date(2026, 2, 10)));
        let labels: Vec<_> = buckets.iter().map(|p| p.bucket_label.as_str()).collect();
        assert_eq!(labels, vec!["0-7 days", "8-14 days", "15-21 days", "22-30 days"]);
        assert_eq!(counts(&buckets), vec![0, 0, 0, 0]);
    }

    #[test]
    fn test_bucket_edges_and_past_dates() {
        let from = date(2026, 2, 10);
        let subs = vec![
            sub("d7", date(2026, 2, 17)),
            sub("d8", date(2026, 2, 18)),
            sub("d21", date(2026, 3, 3)),
            sub("d22", date(2026, 3, 4)),
            sub("past", date(2026, 2, 9)),
        ];
        let buckets = bucket_renewals(&subs, &RenewalBucketOptions::new(from));
        assert_eq!(counts(&buckets), vec![1, 1, 1, 1]);
    }

    #[test]
    fn test_wider_window_folds_into_last_bucket() {
        let subs = vec![sub("d45", date(2026, 3, 27))];
        let from = date(2026, 2, 10);

        let narrow = bucket_renewals(&subs, &RenewalBucketOptions::new(from));
        assert_eq!(counts(&narrow), vec![0, 0, 0, 0]);

        let wide = bucket_renewals(&subs, &RenewalBucketOptions::new(from).with_days_ahead(60));
        assert_eq!(counts(&wide), vec![0, 0, 0, 1]);
    }

    #[test]
    fn test_bucket_json_shape() {
        let buckets = bucket_renewals(&[], &RenewalBucketOptions::new(date(2026, 2, 10)));
        let json = serde_json::to_value(buckets[0]).unwrap();
        assert_eq!(json, serde_json::json!({ "bucketLabel": "0-7 days", "count": 0 }));
    }
}
