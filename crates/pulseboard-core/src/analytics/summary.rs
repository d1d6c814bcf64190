//! Top-line dashboard numbers

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::trend::{project_spend, SpendTrendOptions, DEFAULT_STEP_LIMIT};
use super::upcoming::{upcoming_renewals, DEFAULT_UPCOMING_WINDOW_DAYS};
use crate::models::Subscription;
use crate::normalize::{monthly_total_minor, yearly_total_minor};

const SUMMARY_TREND_MONTHS: u32 = 6;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsSummary {
    pub monthly_baseline_minor: i64,
    pub yearly_forecast_minor: i64,
    /// Billed total over the six calendar months starting with today's
    pub projected_six_month_minor: i64,
    pub active_count: usize,
    pub renewal_count_30_days: usize,
}

pub fn build_summary(subscriptions: &[Subscription], today: NaiveDate) -> AnalyticsSummary {
    build_summary_with_limit(subscriptions, today, DEFAULT_STEP_LIMIT)
}

/// Same as [`build_summary`] with an explicit projection step limit
pub fn build_summary_with_limit(
    subscriptions: &[Subscription],
    today: NaiveDate,
    step_limit: u32,
) -> AnalyticsSummary {
    let options = SpendTrendOptions::new(today)
        .with_months(SUMMARY_TREND_MONTHS)
        .with_step_limit(step_limit);

    AnalyticsSummary {
        monthly_baseline_minor: monthly_total_minor(subscriptions),
        yearly_forecast_minor: yearly_total_minor(subscriptions),
        projected_six_month_minor: project_spend(subscriptions, &options)
            .iter()
            .fold(0i64, |total, p| total.saturating_add(p.amount_minor)),
        active_count: subscriptions.iter().filter(|s| s.is_active).count(),
        renewal_count_30_days: upcoming_renewals(subscriptions, today, DEFAULT_UPCOMING_WINDOW_DAYS)
            .len(),
    }
}
