//! Calendar primitives
//!
//! All dates are plain calendar dates (`NaiveDate`) with no time of day or
//! zone attached, so results never depend on where the code runs or on DST.
//! Every function here is total: arithmetic that would leave chrono's
//! representable range saturates at `NaiveDate::MIN` / `NaiveDate::MAX`.

use std::sync::OnceLock;

use chrono::{Datelike, Days, Months, NaiveDate};
use regex::Regex;

use crate::error::{Error, Result};

const ISO_DATE_FORMAT: &str = "%Y-%m-%d";

fn iso_date_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^\d{4}-\d{2}-\d{2}$").expect("valid regex"))
}

/// The date `days` days after `date` (before it when negative)
pub fn add_days(date: NaiveDate, days: i64) -> NaiveDate {
    if days >= 0 {
        date.checked_add_days(Days::new(days.unsigned_abs()))
            .unwrap_or(NaiveDate::MAX)
    } else {
        date.checked_sub_days(Days::new(days.unsigned_abs()))
            .unwrap_or(NaiveDate::MIN)
    }
}

/// Add calendar months, clamping the day to the end of the target month.
///
/// Jan 31 + 1 month is Feb 28 (Feb 29 in leap years), never Mar 2/3.
pub fn add_months(date: NaiveDate, months: i32) -> NaiveDate {
    if months >= 0 {
        date.checked_add_months(Months::new(months.unsigned_abs()))
            .unwrap_or(NaiveDate::MAX)
    } else {
        date.checked_sub_months(Months::new(months.unsigned_abs()))
            .unwrap_or(NaiveDate::MIN)
    }
}

/// Signed whole days from `b` to `a` (positive when `a` is after `b`)
pub fn days_between(a: NaiveDate, b: NaiveDate) -> i64 {
    a.signed_duration_since(b).num_days()
}

pub fn first_of_month(date: NaiveDate) -> NaiveDate {
    // day0() is at most 30, always representable
    add_days(date, -i64::from(date.day0()))
}

/// `YYYY-MM` bucket key
pub fn month_key(date: NaiveDate) -> String {
    date.format("%Y-%m").to_string()
}

/// Short display label, e.g. `Feb 2026`
pub fn month_label(date: NaiveDate) -> String {
    date.format("%b %Y").to_string()
}

pub fn format_iso_date(date: NaiveDate) -> String {
    date.format(ISO_DATE_FORMAT).to_string()
}

/// Parse a strict `YYYY-MM-DD` calendar date
pub fn parse_iso_date(s: &str) -> Result<NaiveDate> {
    if !iso_date_pattern().is_match(s) {
        return Err(Error::InvalidDate(format!(
            "{:?} is not in YYYY-MM-DD format",
            s
        )));
    }
    NaiveDate::parse_from_str(s, ISO_DATE_FORMAT)
        .map_err(|e| Error::InvalidDate(format!("{}: {}", s, e)))
}

/// Serde adapter keeping dates as `YYYY-MM-DD` strings on the wire
pub mod iso_date {
    use chrono::NaiveDate;
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(date: &NaiveDate, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&super::format_iso_date(*date))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveDate, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        super::parse_iso_date(&raw).map_err(de::Error::custom)
    }
}
