//! Recurrence advancer: moves a charge date forward by one billing cycle

use chrono::NaiveDate;

use crate::calendar::{add_days, add_months};
use crate::models::{BillingCycle, IntervalDays, Subscription};

/// Interval used when a `custom_days` record arrives without one
pub const FALLBACK_INTERVAL_DAYS: u32 = 30;

/// Compute the charge date one cycle after `date`.
///
/// A single forward step; callers loop it (or use [`Occurrences`]) to walk a
/// subscription through time.
pub fn next_charge_date(
    date: NaiveDate,
    cycle: BillingCycle,
    custom_interval_days: Option<IntervalDays>,
) -> NaiveDate {
    match cycle {
        BillingCycle::Weekly => add_days(date, 7),
        BillingCycle::Monthly => add_months(date, 1),
        BillingCycle::Yearly => add_months(date, 12),
        BillingCycle::CustomDays => {
            let interval = custom_interval_days
                .map(|d| d.get())
                .unwrap_or(FALLBACK_INTERVAL_DAYS);
            add_days(date, i64::from(interval))
        }
    }
}

/// Iterator over successive charge dates, starting with the stored one.
///
/// Unbounded; apply a step limit with `take` or an explicit counter.
#[derive(Debug, Clone)]
pub struct Occurrences {
    next: NaiveDate,
    cycle: BillingCycle,
    custom_interval_days: Option<IntervalDays>,
}

impl Occurrences {
    pub fn new(
        start: NaiveDate,
        cycle: BillingCycle,
        custom_interval_days: Option<IntervalDays>,
    ) -> Self {
        Self {
            next: start,
            cycle,
            custom_interval_days,
        }
    }

    /// Occurrences of a subscription from its `nextBillingDate`
    pub fn of(subscription: &Subscription) -> Self {
        Self::new(
            subscription.next_billing_date,
            subscription.billing_cycle,
            subscription.custom_interval_days,
        )
    }
}

impl Iterator for Occurrences {
    type Item = NaiveDate;

    fn next(&mut self) -> Option<NaiveDate> {
        let current = self.next;
        self.next = next_charge_date(current, self.cycle, self.custom_interval_days);
        Some(current)
    }
}
