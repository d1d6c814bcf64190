//! iCalendar export of a subscription's renewal schedule

use chrono::{DateTime, Utc};

use crate::models::{BillingCycle, Subscription};
use crate::recurrence::FALLBACK_INTERVAL_DAYS;

const PRODID: &str = "-//Pulseboard//Subscription Tracker//EN";
const CRLF: &str = "\r\n";

/// Escape TEXT values: backslash, newline, comma and semicolon
fn escape_text(value: &str) -> String {
    value
        .replace('\\', "\\\\")
        .replace('\n', "\\n")
        .replace(',', "\\,")
        .replace(';', "\\;")
}

fn recurrence_rule(subscription: &Subscription) -> String {
    match subscription.billing_cycle {
        BillingCycle::Weekly => "FREQ=WEEKLY;INTERVAL=1".to_string(),
        BillingCycle::Monthly => "FREQ=MONTHLY;INTERVAL=1".to_string(),
        BillingCycle::Yearly => "FREQ=YEARLY;INTERVAL=1".to_string(),
        BillingCycle::CustomDays => format!(
            "FREQ=DAILY;INTERVAL={}",
            subscription
                .custom_interval_days
                .map(|d| d.get())
                .unwrap_or(FALLBACK_INTERVAL_DAYS)
        ),
    }
}

/// Build a VCALENDAR with one recurring all-day VEVENT and a VALARM per
/// positive reminder lead time. `stamp` becomes the DTSTAMP.
pub fn subscription_to_ics(subscription: &Subscription, stamp: DateTime<Utc>) -> String {
    let mut lines = vec![
        "BEGIN:VCALENDAR".to_string(),
        "VERSION:2.0".to_string(),
        format!("PRODID:{}", PRODID),
        "CALSCALE:GREGORIAN".to_string(),
        "BEGIN:VEVENT".to_string(),
        format!("UID:{}@pulseboard.local", subscription.id),
        format!("DTSTAMP:{}", stamp.format("%Y%m%dT%H%M%SZ")),
        format!(
            "DTSTART;VALUE=DATE:{}",
            subscription.next_billing_date.format("%Y%m%d")
        ),
        format!("RRULE:{}", recurrence_rule(subscription)),
        format!("SUMMARY:{}", escape_text(&format!("{} renewal", subscription.name))),
        format!(
            "DESCRIPTION:{}",
            escape_text(
                subscription
                    .notes
                    .as_deref()
                    .unwrap_or("Subscription renewal")
            )
        ),
    ];

    let alarm_text = escape_text(&format!("Upcoming charge: {}", subscription.name));
    for days in subscription.reminder_days_before.iter().filter(|d| **d > 0) {
        lines.push("BEGIN:VALARM".to_string());
        lines.push(format!("TRIGGER:-P{}D", days));
        lines.push("ACTION:DISPLAY".to_string());
        lines.push(format!("DESCRIPTION:{}", alarm_text));
        lines.push("END:VALARM".to_string());
    }

    lines.push("END:VEVENT".to_string());
    lines.push("END:VCALENDAR".to_string());

    let mut body = lines.join(CRLF);
    body.push_str(CRLF);
    body
}
