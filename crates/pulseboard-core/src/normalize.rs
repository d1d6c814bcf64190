//! Cycle normalization: express any billing cycle as a monthly or yearly rate
//!
//! The two rates are kept consistent: `yearly ≈ 12 × monthly`, differing only
//! where a cycle's length does not divide evenly into months (weekly uses
//! 52 weeks, custom cycles use 30-day months against a 365-day year).

use crate::models::{BillingCycle, Subscription};
use crate::recurrence::FALLBACK_INTERVAL_DAYS;

fn interval_days(subscription: &Subscription) -> f64 {
    f64::from(
        subscription
            .custom_interval_days
            .map(|d| d.get())
            .unwrap_or(FALLBACK_INTERVAL_DAYS),
    )
}

/// Approximate cost per month, in (fractional) minor units
pub fn monthly_equivalent(subscription: &Subscription) -> f64 {
    let amount = subscription.amount_minor as f64;
    match subscription.billing_cycle {
        BillingCycle::Weekly => amount * (52.0 / 12.0),
        BillingCycle::Monthly => amount,
        BillingCycle::Yearly => amount / 12.0,
        BillingCycle::CustomDays => amount * (30.0 / interval_days(subscription)),
    }
}

/// Approximate cost per year, in (fractional) minor units
pub fn yearly_equivalent(subscription: &Subscription) -> f64 {
    let amount = subscription.amount_minor as f64;
    match subscription.billing_cycle {
        BillingCycle::Weekly => amount * 52.0,
        BillingCycle::Monthly => amount * 12.0,
        BillingCycle::Yearly => amount,
        BillingCycle::CustomDays => amount * (365.0 / interval_days(subscription)),
    }
}

/// Monthly baseline across active subscriptions, rounded once after summing
pub fn monthly_total_minor(subscriptions: &[Subscription]) -> i64 {
    subscriptions
        .iter()
        .filter(|s| s.is_active)
        .map(monthly_equivalent)
        .sum::<f64>()
        .round() as i64
}

/// Yearly forecast across active subscriptions, rounded once after summing
pub fn yearly_total_minor(subscriptions: &[Subscription]) -> i64 {
    subscriptions
        .iter()
        .filter(|s| s.is_active)
        .map(yearly_equivalent)
        .sum::<f64>()
        .round() as i64
}
