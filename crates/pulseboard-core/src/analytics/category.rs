//! Category spend aggregator

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::models::{Category, Subscription};
use crate::normalize::monthly_equivalent;

/// Monthly-equivalent spend for one category and its share of the total
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategorySpendPoint {
    pub category: Category,
    pub amount_minor: i64,
    /// Fraction of the grand total, in `[0, 1]`
    pub share: f64,
}

/// Break monthly-equivalent spend of active subscriptions down by category.
///
/// Amounts are rounded per category after summing. Categories that round to
/// zero are left out, and an empty list is returned when nothing remains.
/// Sorted by amount, largest first; ties keep category declaration order.
pub fn aggregate_by_category(subscriptions: &[Subscription]) -> Vec<CategorySpendPoint> {
    let mut totals: BTreeMap<Category, f64> = BTreeMap::new();
    for sub in subscriptions.iter().filter(|s| s.is_active) {
        *totals.entry(sub.category).or_insert(0.0) += monthly_equivalent(sub);
    }

    let rounded: Vec<(Category, i64)> = totals
        .into_iter()
        .map(|(category, amount)| (category, amount.round() as i64))
        .filter(|(_, amount)| *amount > 0)
        .collect();

    let total = rounded
        .iter()
        .fold(0i64, |total, (_, amount)| total.saturating_add(*amount));
    if total <= 0 {
        return Vec::new();
    }

    let mut points: Vec<CategorySpendPoint> = rounded
        .into_iter()
        .map(|(category, amount_minor)| CategorySpendPoint {
            category,
            amount_minor,
            share: amount_minor as f64 / total as f64,
        })
        .collect();

    // sort_by is stable, so equal amounts stay in declaration order
    points.sort_by(|a, b| b.amount_minor.cmp(&a.amount_minor));

    debug!(categories = points.len(), total_minor = total, "Category spend aggregated");
    points
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{BillingCycle, IntervalDays};
    use chrono::NaiveDate;

    fn sub(id: &str, amount: i64, cycle: BillingCycle, category: Category) -> Subscription {
        Subscription::new(id, id, amount, cycle, NaiveDate::from_ymd_opt(2026, 2, 15).unwrap())
            .with_category(category)
    }

    #[test]
    fn test_category_totals_and_shares() {
        let subs = vec![
            sub("productivity_monthly", 1000, BillingCycle::Monthly, Category::Productivity),
            sub("productivity_yearly", 12000, BillingCycle::Yearly, Category::Productivity),
            sub("utilities_weekly", 500, BillingCycle::Weekly, Category::Utilities),
            sub("health_custom", 300, BillingCycle::CustomDays, Category::Health)
                .with_custom_interval(IntervalDays::new(10).unwrap()),
        ];

        let points = aggregate_by_category(&subs);
        let pairs: Vec<_> = points.iter().map(|p| (p.category, p.amount_minor)).collect();
        assert_eq!(
            pairs,
            vec![
                (Category::Utilities, 2167),
                (Category::Productivity, 2000),
                (Category::Health, 900),
            ]
        );

        let share_sum: f64 = points.iter().map(|p| p.share).sum();
        assert!((share_sum - 1.0).abs() < 1e-8);
    }

    #[test]
    fn test_empty_and_inactive_only() {
        assert!(aggregate_by_category(&[]).is_empty());

        let subs = vec![sub("off", 1000, BillingCycle::Monthly, Category::Health).inactive()];
        assert!(aggregate_by_category(&subs).is_empty());
    }

    #[test]
    fn test_ties_follow_declaration_order() {
        let subs = vec![
            sub("o", 500, BillingCycle::Monthly, Category::Other),
            sub("h", 500, BillingCycle::Monthly, Category::Health),
            sub("e", 500, BillingCycle::Monthly, Category::Entertainment),
        ];
        let order: Vec<_> = aggregate_by_category(&subs).iter().map(|p| p.category).collect();
        assert_eq!(order, vec![Category::Entertainment, Category::Health, Category::Other]);
    }

    #[test]
    fn test_rounds_to_zero_is_dropped() {
        // 1 minor unit per year is 0.083/month, rounds to zero
        let subs = vec![
            sub("tiny", 1, BillingCycle::Yearly, Category::Health),
            sub("m", 1000, BillingCycle::Monthly, Category::Utilities),
        ];
        let points = aggregate_by_category(&subs);
        assert_eq!(points.len(), 1);
        assert_eq!(points[0].category, Category::Utilities);
        assert_eq!(points[0].share, 1.0);
    }
}
