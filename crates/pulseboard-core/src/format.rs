//! Display formatting for amounts, labels and due dates

use crate::models::{BillingCycle, Category};

fn currency_symbol(currency: &str) -> Option<&'static str> {
    match currency.to_ascii_uppercase().as_str() {
        "USD" | "CAD" | "AUD" => Some("$"),
        "EUR" => Some("€"),
        "GBP" => Some("£"),
        "JPY" => Some("¥"),
        _ => None,
    }
}

/// Group an integer's digits in threes: 1234567 -> "1,234,567"
fn group_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

/// Render minor units as a currency amount, e.g. `format_minor(123456, "USD")`
/// is `"$1,234.56"` and `format_minor(999, "CHF")` is `"9.99 CHF"`.
pub fn format_minor(amount_minor: i64, currency: &str) -> String {
    let sign = if amount_minor < 0 { "-" } else { "" };
    let abs = amount_minor.unsigned_abs();
    let number = format!("{}.{:02}", group_thousands(abs / 100), abs % 100);

    match currency_symbol(currency) {
        Some(symbol) => format!("{}{}{}", sign, symbol, number),
        None => format!("{}{} {}", sign, number, currency.to_ascii_uppercase()),
    }
}

fn title_case(value: &str) -> String {
    value
        .split('_')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

pub fn category_label(category: Category) -> String {
    title_case(category.as_str())
}

pub fn billing_cycle_label(cycle: BillingCycle) -> String {
    match cycle {
        BillingCycle::CustomDays => "Custom (days)".to_string(),
        other => title_case(other.as_str()),
    }
}

/// "Due today", "Due tomorrow" or "Due in N days"
pub fn format_relative_due(days: i64) -> String {
    match days {
        0 => "Due today".to_string(),
        1 => "Due tomorrow".to_string(),
        n => format!("Due in {} days", n),
    }
}
