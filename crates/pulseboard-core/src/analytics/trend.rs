//! Spend trend projector
//!
//! Projects billed amounts per calendar month over a forward window by
//! walking each active subscription's charge dates.

use std::collections::HashMap;
use std::io::Write;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::calendar::{add_months, first_of_month, month_key, month_label};
use crate::error::Result;
use crate::models::Subscription;
use crate::recurrence::Occurrences;

/// Default projection window in months
pub const DEFAULT_TREND_MONTHS: u32 = 6;

/// Step cap for each walk (catch-up and projection): ~50 years of daily cycles
pub const DEFAULT_STEP_LIMIT: u32 = 18_263;

/// Total billed amount for one calendar month
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpendTrendPoint {
    /// `YYYY-MM`
    pub month_key: String,
    /// e.g. `Feb 2026`
    pub month_label: String,
    pub amount_minor: i64,
}

#[derive(Debug, Clone, Copy)]
pub struct SpendTrendOptions {
    /// Reference date; occurrences before it are not counted
    pub from: NaiveDate,
    /// Number of monthly buckets (at least one is always produced)
    pub months_ahead: u32,
    /// Iteration cap for each walk
    pub step_limit: u32,
}

impl SpendTrendOptions {
    pub fn new(from: NaiveDate) -> Self {
        Self {
            from,
            months_ahead: DEFAULT_TREND_MONTHS,
            step_limit: DEFAULT_STEP_LIMIT,
        }
    }

    pub fn with_months(mut self, months_ahead: u32) -> Self {
        self.months_ahead = months_ahead;
        self
    }

    pub fn with_step_limit(mut self, step_limit: u32) -> Self {
        self.step_limit = step_limit;
        self
    }
}

/// Project monthly spend over `months_ahead` months starting at `from`'s month.
///
/// Stored charge dates that lie before `from` are advanced without being
/// counted; those occurrences are treated as already billed. Each walk stops
/// after `step_limit` steps, truncating the projection for that subscription.
/// Bucket totals saturate at `i64::MAX` rather than wrapping.
pub fn project_spend(
    subscriptions: &[Subscription],
    options: &SpendTrendOptions,
) -> Vec<SpendTrendPoint> {
    let months_ahead = options.months_ahead.max(1);
    let window_start = first_of_month(options.from);
    let window_end = add_months(window_start, i32::try_from(months_ahead).unwrap_or(i32::MAX));

    let mut points: Vec<SpendTrendPoint> = (0..months_ahead)
        .map(|index| {
            let month_start = add_months(window_start, index as i32);
            SpendTrendPoint {
                month_key: month_key(month_start),
                month_label: month_label(month_start),
                amount_minor: 0,
            }
        })
        .collect();

    let index_by_key: HashMap<String, usize> = points
        .iter()
        .enumerate()
        .map(|(index, point)| (point.month_key.clone(), index))
        .collect();

    let step_limit = options.step_limit as usize;

    for sub in subscriptions.iter().filter(|s| s.is_active) {
        let mut dates = Occurrences::of(sub);

        // Stored date plus up to `step_limit` advances
        let Some(first) = dates
            .by_ref()
            .take(step_limit.saturating_add(1))
            .find(|date| *date >= options.from)
        else {
            warn!(
                subscription = %sub.id,
                steps = step_limit,
                "Catch-up walk hit step limit; projection truncated"
            );
            continue;
        };

        let mut in_window = std::iter::once(first)
            .chain(dates)
            .take_while(|date| *date < window_end);
        for charge_date in in_window.by_ref().take(step_limit) {
            if let Some(&index) = index_by_key.get(&month_key(charge_date)) {
                let point = &mut points[index];
                match point.amount_minor.checked_add(sub.amount_minor) {
                    Some(total) => point.amount_minor = total,
                    None => {
                        warn!(
                            subscription = %sub.id,
                            month = %point.month_key,
                            "Monthly spend overflowed; clamped to maximum"
                        );
                        point.amount_minor = i64::MAX;
                    }
                }
            }
        }
        if in_window.next().is_some() {
            warn!(
                subscription = %sub.id,
                steps = step_limit,
                "Projection walk hit step limit; projection truncated"
            );
        }
    }

    debug!(
        months = months_ahead,
        from = %options.from,
        subscriptions = subscriptions.len(),
        "Spend trend projected"
    );

    points
}

/// Write trend points as CSV (`month_key,month_label,amount_minor`)
pub fn write_trend_csv<W: Write>(points: &[SpendTrendPoint], writer: W) -> Result<()> {
    let mut csv = csv::Writer::from_writer(writer);
    csv.write_record(["month_key", "month_label", "amount_minor"])?;
    for point in points {
        csv.write_record([
            point.month_key.as_str(),
            point.month_label.as_str(),
            &point.amount_minor.to_string(),
        ])?;
    }
    csv.flush()?;
    Ok(())
}
