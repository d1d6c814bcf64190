//! Report command implementations

use anyhow::{Context, Result};
use pulseboard_core::analytics::{
    aggregate_by_category, bucket_renewals, build_summary_with_limit, project_spend,
    upcoming_renewals, write_trend_csv, RenewalBucketOptions, SpendTrendOptions,
};
use pulseboard_core::calendar::{days_between, format_iso_date};
use pulseboard_core::format::{
    billing_cycle_label, category_label, format_minor, format_relative_due,
};
use pulseboard_core::models::BillingCycle;
use serde::Serialize;

use super::{print_json, truncate, Session};

pub fn cmd_summary(session: &Session) -> Result<()> {
    let subs = &session.snapshot.subscriptions;
    let summary = build_summary_with_limit(subs, session.today, session.config.engine.step_limit);

    if session.json {
        return print_json(&summary);
    }

    let currency = session.currency();
    println!();
    println!("📊 Pulseboard Summary ({})", format_iso_date(session.today));
    println!("   ─────────────────────────────────────────");
    println!(
        "   Active subscriptions:  {} of {}",
        summary.active_count,
        subs.len()
    );
    println!(
        "   Monthly baseline:      {}",
        format_minor(summary.monthly_baseline_minor, currency)
    );
    println!(
        "   Yearly forecast:       {}",
        format_minor(summary.yearly_forecast_minor, currency)
    );
    println!(
        "   Next 6 months:         {}",
        format_minor(summary.projected_six_month_minor, currency)
    );
    println!("   Renewals in 30 days:   {}", summary.renewal_count_30_days);
    println!();

    if summary.renewal_count_30_days > 0 {
        println!("   Run 'pulseboard upcoming' to see what renews next.");
    }

    Ok(())
}

pub fn cmd_trend(session: &Session, months: Option<u32>, csv: bool) -> Result<()> {
    let options = SpendTrendOptions::new(session.today)
        .with_months(months.unwrap_or(session.config.defaults.trend_months))
        .with_step_limit(session.config.engine.step_limit);
    let trend = project_spend(&session.snapshot.subscriptions, &options);

    if csv {
        let stdout = std::io::stdout();
        return write_trend_csv(&trend, stdout.lock()).context("Failed to write CSV");
    }
    if session.json {
        return print_json(&trend);
    }

    let currency = session.currency();
    let peak = trend.iter().map(|p| p.amount_minor).max().unwrap_or(0);
    let total: i64 = trend.iter().map(|p| p.amount_minor).sum();

    println!();
    println!("📈 Projected Spend");
    println!("   ─────────────────────────────────────────────────────");
    for point in &trend {
        let bar_len = if peak > 0 {
            ((point.amount_minor as f64 / peak as f64) * 30.0).round() as usize
        } else {
            0
        };
        println!(
            "   {:<9} {:>14}  {}",
            point.month_label,
            format_minor(point.amount_minor, currency),
            "█".repeat(bar_len)
        );
    }
    println!("   ─────────────────────────────────────────────────────");
    println!("   {:<9} {:>14}", "Total", format_minor(total, currency));
    println!();

    Ok(())
}

pub fn cmd_categories(session: &Session) -> Result<()> {
    let points = aggregate_by_category(&session.snapshot.subscriptions);

    if session.json {
        return print_json(&points);
    }

    if points.is_empty() {
        println!("No active spend to break down.");
        return Ok(());
    }

    let currency = session.currency();
    println!();
    println!("🏷️  Monthly Spend by Category");
    println!("   ─────────────────────────────────────────");
    for point in &points {
        println!(
            "   {:<15} {:>12}  {:>5.1}%",
            category_label(point.category),
            format_minor(point.amount_minor, currency),
            point.share * 100.0
        );
    }
    println!();

    Ok(())
}

pub fn cmd_buckets(session: &Session, days: Option<i64>) -> Result<()> {
    let options = RenewalBucketOptions::new(session.today)
        .with_days_ahead(days.unwrap_or(session.config.defaults.bucket_days_ahead));
    let buckets = bucket_renewals(&session.snapshot.subscriptions, &options);

    if session.json {
        return print_json(&buckets);
    }

    println!();
    println!("🗓️  Renewals by Time Until Charge");
    println!("   ─────────────────────────────");
    for bucket in &buckets {
        println!("   {:<11} {:>4}", bucket.bucket_label.as_str(), bucket.count);
    }
    println!();

    Ok(())
}

/// One row of `pulseboard upcoming`
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpcomingRow {
    pub id: String,
    pub name: String,
    pub next_billing_date: String,
    pub days_until: i64,
    pub amount_minor: i64,
    pub currency: String,
    pub billing_cycle: BillingCycle,
}

pub fn upcoming_rows(session: &Session, window: Option<i64>) -> Vec<UpcomingRow> {
    let window = window.unwrap_or(session.config.defaults.upcoming_window_days);
    upcoming_renewals(&session.snapshot.subscriptions, session.today, window)
        .into_iter()
        .map(|sub| UpcomingRow {
            id: sub.id.clone(),
            name: sub.name.clone(),
            next_billing_date: format_iso_date(sub.next_billing_date),
            days_until: days_between(sub.next_billing_date, session.today),
            amount_minor: sub.amount_minor,
            currency: sub.currency.clone(),
            billing_cycle: sub.billing_cycle,
        })
        .collect()
}

pub fn cmd_upcoming(session: &Session, window: Option<i64>) -> Result<()> {
    let rows = upcoming_rows(session, window);

    if session.json {
        return print_json(&rows);
    }

    if rows.is_empty() {
        println!("No renewals in the selected window.");
        return Ok(());
    }

    println!();
    println!("⏰ Upcoming Renewals");
    println!("   ─────────────────────────────────────────────────────────────────");
    for row in &rows {
        println!(
            "   {}  {:<24} {:>12}  {:<14} {}",
            row.next_billing_date,
            truncate(&row.name, 24),
            format_minor(row.amount_minor, &row.currency),
            billing_cycle_label(row.billing_cycle),
            format_relative_due(row.days_until)
        );
    }
    println!();

    Ok(())
}
