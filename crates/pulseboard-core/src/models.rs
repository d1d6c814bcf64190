//! Domain models for Pulseboard

use std::collections::HashSet;
use std::fmt;
use std::num::NonZeroU32;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::calendar;
use crate::error::{Error, Result};

/// Lead times used when a subscription is created without explicit reminders
pub const DEFAULT_REMINDER_DAYS: [u32; 3] = [1, 3, 7];

/// Currency applied to records that do not carry one
pub const DEFAULT_CURRENCY: &str = "USD";

/// Longest accepted free-text note
pub const MAX_NOTES_LEN: usize = 2000;

/// How often a subscription is charged
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BillingCycle {
    Weekly,
    Monthly,
    Yearly,
    /// Every `customIntervalDays` days
    CustomDays,
}

impl BillingCycle {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Weekly => "weekly",
            Self::Monthly => "monthly",
            Self::Yearly => "yearly",
            Self::CustomDays => "custom_days",
        }
    }

    pub fn all() -> &'static [BillingCycle] {
        &[Self::Weekly, Self::Monthly, Self::Yearly, Self::CustomDays]
    }
}

impl fmt::Display for BillingCycle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for BillingCycle {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "weekly" => Ok(Self::Weekly),
            "monthly" => Ok(Self::Monthly),
            "yearly" => Ok(Self::Yearly),
            "custom_days" => Ok(Self::CustomDays),
            _ => Err(format!(
                "Unknown billing cycle: {} (valid: weekly, monthly, yearly, custom_days)",
                s
            )),
        }
    }
}

/// Spending category tag
///
/// Declaration order doubles as the tie-break order in category aggregation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Entertainment,
    Productivity,
    Utilities,
    Health,
    Other,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Entertainment => "entertainment",
            Self::Productivity => "productivity",
            Self::Utilities => "utilities",
            Self::Health => "health",
            Self::Other => "other",
        }
    }

    pub fn all() -> &'static [Category] {
        &[
            Self::Entertainment,
            Self::Productivity,
            Self::Utilities,
            Self::Health,
            Self::Other,
        ]
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "entertainment" => Ok(Self::Entertainment),
            "productivity" => Ok(Self::Productivity),
            "utilities" => Ok(Self::Utilities),
            "health" => Ok(Self::Health),
            "other" => Ok(Self::Other),
            _ => Err(format!("Unknown category: {}", s)),
        }
    }
}

/// A positive day count for `custom_days` billing
///
/// Zero is unrepresentable, so a custom cycle always moves the charge date
/// forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct IntervalDays(NonZeroU32);

impl IntervalDays {
    pub fn new(days: u32) -> Result<Self> {
        NonZeroU32::new(days)
            .map(Self)
            .ok_or_else(|| Error::InvalidData("customIntervalDays must be a positive integer".into()))
    }

    pub fn get(&self) -> u32 {
        self.0.get()
    }
}

impl TryFrom<u32> for IntervalDays {
    type Error = Error;

    fn try_from(days: u32) -> Result<Self> {
        Self::new(days)
    }
}

impl From<IntervalDays> for u32 {
    fn from(days: IntervalDays) -> Self {
        days.get()
    }
}

impl fmt::Display for IntervalDays {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.get())
    }
}

fn default_currency() -> String {
    DEFAULT_CURRENCY.to_string()
}

/// A tracked recurring subscription
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Subscription {
    pub id: String,
    pub name: String,
    /// Charge amount in the currency's smallest unit
    pub amount_minor: i64,
    #[serde(default = "default_currency")]
    pub currency: String,
    pub billing_cycle: BillingCycle,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_interval_days: Option<IntervalDays>,
    #[serde(with = "calendar::iso_date")]
    pub next_billing_date: NaiveDate,
    pub category: Category,
    #[serde(default)]
    pub reminder_days_before: Vec<u32>,
    pub is_active: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl Subscription {
    /// Create an active subscription with default category, currency and reminders
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        amount_minor: i64,
        billing_cycle: BillingCycle,
        next_billing_date: NaiveDate,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            amount_minor,
            currency: default_currency(),
            billing_cycle,
            custom_interval_days: None,
            next_billing_date,
            category: Category::Other,
            reminder_days_before: DEFAULT_REMINDER_DAYS.to_vec(),
            is_active: true,
            notes: None,
        }
    }

    /// Switch to a `custom_days` cycle of the given length
    pub fn with_custom_interval(mut self, days: IntervalDays) -> Self {
        self.billing_cycle = BillingCycle::CustomDays;
        self.custom_interval_days = Some(days);
        self
    }

    pub fn with_category(mut self, category: Category) -> Self {
        self.category = category;
        self
    }

    pub fn with_reminders(mut self, days_before: impl Into<Vec<u32>>) -> Self {
        self.reminder_days_before = days_before.into();
        self
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }

    pub fn inactive(mut self) -> Self {
        self.is_active = false;
        self
    }

    /// Check the record against the boundary rules the engine relies on.
    ///
    /// The analytics functions never call this themselves; callers validate
    /// once when a snapshot enters the system.
    pub fn validate(&self) -> Result<()> {
        if self.id.trim().is_empty() {
            return Err(Error::InvalidData("id must not be empty".into()));
        }
        if self.name.trim().is_empty() {
            return Err(Error::InvalidData(format!(
                "subscription {}: name is required",
                self.id
            )));
        }
        if self.amount_minor <= 0 {
            return Err(Error::InvalidData(format!(
                "subscription {}: amountMinor must be greater than 0 (got {})",
                self.id, self.amount_minor
            )));
        }
        if self.billing_cycle == BillingCycle::CustomDays && self.custom_interval_days.is_none() {
            return Err(Error::InvalidData(format!(
                "subscription {}: customIntervalDays is required for custom_days billing",
                self.id
            )));
        }
        if self.currency.len() != 3 || !self.currency.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(Error::InvalidData(format!(
                "subscription {}: currency must be a three-letter code (got {:?})",
                self.id, self.currency
            )));
        }
        if let Some(notes) = &self.notes {
            if notes.chars().count() > MAX_NOTES_LEN {
                return Err(Error::InvalidData(format!(
                    "subscription {}: notes exceed {} characters",
                    self.id, MAX_NOTES_LEN
                )));
            }
        }
        Ok(())
    }
}

/// Validate every record and reject duplicate ids
pub fn validate_all(subscriptions: &[Subscription]) -> Result<()> {
    let mut seen = HashSet::new();
    for sub in subscriptions {
        sub.validate()?;
        if !seen.insert(sub.id.as_str()) {
            return Err(Error::InvalidData(format!(
                "duplicate subscription id: {}",
                sub.id
            )));
        }
    }
    Ok(())
}

/// Colour scheme preference carried in backups
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemePreference {
    System,
    Light,
    Dark,
}

/// User settings carried in backups
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppSettings {
    pub default_currency: String,
    /// 0 = Sunday, 1 = Monday
    pub week_starts_on: u8,
    pub notifications_enabled: bool,
    pub theme_preference: ThemePreference,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            default_currency: default_currency(),
            week_starts_on: 0,
            notifications_enabled: false,
            theme_preference: ThemePreference::System,
        }
    }
}

/// Backup document version this build understands
pub const BACKUP_VERSION: &str = "1.0";

/// Full backup document (`version`, `exportedAt`, `settings`, `subscriptions`)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BackupFile {
    pub version: String,
    pub exported_at: String,
    pub settings: AppSettings,
    pub subscriptions: Vec<Subscription>,
}

/// The set of subscriptions an analysis runs over
#[derive(Debug, Clone, Default)]
pub struct SubscriptionSnapshot {
    pub settings: Option<AppSettings>,
    pub subscriptions: Vec<Subscription>,
}

impl SubscriptionSnapshot {
    /// Parse either a bare JSON array of subscriptions or a backup document
    pub fn from_json(content: &str) -> Result<Self> {
        let value: serde_json::Value = serde_json::from_str(content)?;

        match value {
            serde_json::Value::Array(_) => Ok(Self {
                settings: None,
                subscriptions: serde_json::from_value(value)?,
            }),
            serde_json::Value::Object(_) => {
                let backup: BackupFile = serde_json::from_value(value)?;
                if backup.version != BACKUP_VERSION {
                    return Err(Error::InvalidData(format!(
                        "Unsupported backup version: {} (expected {})",
                        backup.version, BACKUP_VERSION
                    )));
                }
                Ok(Self {
                    settings: Some(backup.settings),
                    subscriptions: backup.subscriptions,
                })
            }
            _ => Err(Error::InvalidData(
                "Snapshot must be a JSON array or a backup object".into(),
            )),
        }
    }

    /// Currency for rendering totals: the backup setting, else the first record's
    pub fn currency(&self) -> &str {
        self.settings
            .as_ref()
            .map(|s| s.default_currency.as_str())
            .or_else(|| self.subscriptions.first().map(|s| s.currency.as_str()))
            .unwrap_or(DEFAULT_CURRENCY)
    }

    pub fn validate(&self) -> Result<()> {
        validate_all(&self.subscriptions)
    }

    pub fn find(&self, id: &str) -> Option<&Subscription> {
        self.subscriptions.iter().find(|s| s.id == id)
    }

    pub fn active_count(&self) -> usize {
        self.subscriptions.iter().filter(|s| s.is_active).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_interval_days_rejects_zero() {
        assert!(IntervalDays::new(0).is_err());
        assert_eq!(IntervalDays::new(10).unwrap().get(), 10);
    }

    #[test]
    fn test_subscription_json_shape() {
        let sub = Subscription::new("sub_1", "Pro Plan", 1000, BillingCycle::Monthly, date(2026, 2, 15))
            .with_category(Category::Productivity);

        let json = serde_json::to_value(&sub).unwrap();
        assert_eq!(json["amountMinor"], 1000);
        assert_eq!(json["billingCycle"], "monthly");
        assert_eq!(json["nextBillingDate"], "2026-02-15");
        assert_eq!(json["category"], "productivity");
        assert_eq!(json["reminderDaysBefore"], serde_json::json!([1, 3, 7]));
        assert!(json.get("customIntervalDays").is_none());
    }

    #[test]
    fn test_deserialize_rejects_zero_interval() {
        let raw = r#"{
            "id": "c", "name": "Custom", "amountMinor": 300,
            "billingCycle": "custom_days", "customIntervalDays": 0,
            "nextBillingDate": "2026-02-10", "category": "health",
            "reminderDaysBefore": [], "isActive": true
        }"#;
        assert!(serde_json::from_str::<Subscription>(raw).is_err());
    }

    #[test]
    fn test_deserialize_ignores_timestamps_and_defaults_currency() {
        let raw = r#"{
            "id": "c", "name": "Custom", "amountMinor": 300,
            "billingCycle": "custom_days", "customIntervalDays": 10,
            "nextBillingDate": "2026-02-10", "category": "health",
            "reminderDaysBefore": [1], "isActive": true,
            "createdAt": "2026-01-01T00:00:00.000Z",
            "updatedAt": "2026-01-01T00:00:00.000Z"
        }"#;
        let sub: Subscription = serde_json::from_str(raw).unwrap();
        assert_eq!(sub.currency, "USD");
        assert_eq!(sub.custom_interval_days.map(|d| d.get()), Some(10));
    }

    #[test]
    fn test_validate_rules() {
        let base = Subscription::new("a", "Base", 1000, BillingCycle::Monthly, date(2026, 2, 15));
        assert!(base.validate().is_ok());

        let mut zero = base.clone();
        zero.amount_minor = 0;
        assert!(zero.validate().is_err());

        let mut missing_interval = base.clone();
        missing_interval.billing_cycle = BillingCycle::CustomDays;
        let err = missing_interval.validate().unwrap_err();
        assert!(err.to_string().contains("customIntervalDays"));

        let mut blank = base.clone();
        blank.name = "   ".into();
        assert!(blank.validate().is_err());

        let mut bad_currency = base.clone();
        bad_currency.currency = "US".into();
        assert!(bad_currency.validate().is_err());

        let long_notes = base.clone().with_notes("x".repeat(MAX_NOTES_LEN + 1));
        assert!(long_notes.validate().is_err());
    }

    #[test]
    fn test_validate_all_rejects_duplicate_ids() {
        let a = Subscription::new("a", "One", 100, BillingCycle::Weekly, date(2026, 1, 1));
        let b = Subscription::new("a", "Two", 200, BillingCycle::Weekly, date(2026, 1, 1));
        let err = validate_all(&[a, b]).unwrap_err();
        assert!(err.to_string().contains("duplicate"));
    }

    #[test]
    fn test_snapshot_from_array_and_backup() {
        let array = r#"[{
            "id": "a", "name": "A", "amountMinor": 100, "billingCycle": "weekly",
            "nextBillingDate": "2026-02-11", "category": "other",
            "reminderDaysBefore": [], "isActive": true, "currency": "EUR"
        }]"#;
        let snapshot = SubscriptionSnapshot::from_json(array).unwrap();
        assert!(snapshot.settings.is_none());
        assert_eq!(snapshot.currency(), "EUR");

        let backup = r#"{
            "version": "1.0",
            "exportedAt": "2026-02-01T10:00:00.000Z",
            "settings": {
                "defaultCurrency": "GBP", "weekStartsOn": 1,
                "notificationsEnabled": true, "themePreference": "dark"
            },
            "subscriptions": []
        }"#;
        let snapshot = SubscriptionSnapshot::from_json(backup).unwrap();
        assert_eq!(snapshot.currency(), "GBP");
        assert!(snapshot.subscriptions.is_empty());
    }

    #[test]
    fn test_snapshot_rejects_unknown_version() {
        let backup = r#"{
            "version": "2.0", "exportedAt": "2026-02-01T10:00:00.000Z",
            "settings": {
                "defaultCurrency": "USD", "weekStartsOn": 0,
                "notificationsEnabled": false, "themePreference": "system"
            },
            "subscriptions": []
        }"#;
        let err = SubscriptionSnapshot::from_json(backup).unwrap_err();
        assert!(err.to_string().contains("Unsupported backup version"));
    }

    #[test]
    fn test_enum_round_trip_strings() {
        for cycle in BillingCycle::all() {
            assert_eq!(cycle.as_str().parse::<BillingCycle>().unwrap(), *cycle);
        }
        for category in Category::all() {
            assert_eq!(category.as_str().parse::<Category>().unwrap(), *category);
        }
        assert!("fortnightly".parse::<BillingCycle>().is_err());
    }
}
