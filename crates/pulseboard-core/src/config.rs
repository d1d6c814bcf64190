//! Configuration loading
//!
//! Resolution order: an explicit path, then the per-user override at
//! `<data dir>/pulseboard/config.toml`, then the defaults compiled into the
//! binary from `config/pulseboard.toml`. Keys missing from the chosen file
//! keep their built-in defaults.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::analytics::{
    DEFAULT_BUCKET_DAYS_AHEAD, DEFAULT_STEP_LIMIT, DEFAULT_TREND_MONTHS,
    DEFAULT_UPCOMING_WINDOW_DAYS,
};
use crate::error::{Error, Result};
use crate::models::DEFAULT_CURRENCY;

/// Default config embedded at compile time
const DEFAULT_CONFIG: &str = include_str!("../../../config/pulseboard.toml");

const APP_DIR: &str = "pulseboard";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Config {
    pub defaults: DefaultsConfig,
    pub engine: EngineConfig,
    pub reminders: RemindersConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DefaultsConfig {
    pub currency: String,
    pub trend_months: u32,
    pub upcoming_window_days: i64,
    pub bucket_days_ahead: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EngineConfig {
    pub step_limit: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RemindersConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub database: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            defaults: DefaultsConfig {
                currency: DEFAULT_CURRENCY.to_string(),
                trend_months: DEFAULT_TREND_MONTHS,
                upcoming_window_days: DEFAULT_UPCOMING_WINDOW_DAYS,
                bucket_days_ahead: DEFAULT_BUCKET_DAYS_AHEAD,
            },
            engine: EngineConfig {
                step_limit: DEFAULT_STEP_LIMIT,
            },
            reminders: RemindersConfig::default(),
        }
    }
}

/// Where the loaded configuration came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    File(PathBuf),
    Embedded,
}

impl fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::File(path) => write!(f, "{}", path.display()),
            Self::Embedded => write!(f, "(built-in defaults)"),
        }
    }
}

/// Per-user override path
pub fn default_config_path() -> Option<PathBuf> {
    dirs::data_local_dir().map(|d| d.join(APP_DIR).join("config.toml"))
}

/// Reminder database used when the config does not name one
pub fn default_reminder_db_path() -> Option<PathBuf> {
    dirs::data_local_dir().map(|d| d.join(APP_DIR).join("reminders.db"))
}

impl Config {
    /// Load configuration, returning it with the file it was read from.
    ///
    /// An explicit path that does not exist is an error; a missing per-user
    /// override silently falls back to the embedded defaults.
    pub fn load(explicit: Option<&Path>) -> Result<(Self, ConfigSource)> {
        let (content, source) = match explicit {
            Some(path) => {
                if !path.exists() {
                    return Err(Error::Config(format!(
                        "Config file not found: {}",
                        path.display()
                    )));
                }
                (read_config(path)?, ConfigSource::File(path.to_path_buf()))
            }
            None => match default_config_path().filter(|p| p.exists()) {
                Some(path) => (read_config(&path)?, ConfigSource::File(path)),
                None => (DEFAULT_CONFIG.to_string(), ConfigSource::Embedded),
            },
        };

        let config = parse_config(&content)?;
        debug!(source = %source, "Configuration loaded");
        Ok((config, source))
    }

    /// Reminder database path: configured, else the platform default
    pub fn reminder_db_path(&self) -> Result<PathBuf> {
        self.reminders
            .database
            .clone()
            .or_else(default_reminder_db_path)
            .ok_or_else(|| {
                Error::Config("No data directory available; set [reminders] database".into())
            })
    }

    /// Render as TOML
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| Error::Config(format!("Failed to render config: {}", e)))
    }
}

fn read_config(path: &Path) -> Result<String> {
    fs::read_to_string(path).map_err(|e| {
        Error::Config(format!("Failed to read config {}: {}", path.display(), e))
    })
}

/// Raw config structure for TOML parsing
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawConfig {
    defaults: Option<RawDefaults>,
    engine: Option<RawEngine>,
    reminders: Option<RawReminders>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawDefaults {
    currency: Option<String>,
    trend_months: Option<u32>,
    upcoming_window_days: Option<i64>,
    bucket_days_ahead: Option<i64>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawEngine {
    step_limit: Option<u32>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawReminders {
    database: Option<PathBuf>,
}

/// Parse config from TOML content
fn parse_config(content: &str) -> Result<Config> {
    let raw: RawConfig =
        toml::from_str(content).map_err(|e| Error::Config(format!("Invalid config TOML: {}", e)))?;

    let mut config = Config::default();

    if let Some(defaults) = raw.defaults {
        if let Some(currency) = defaults.currency {
            if currency.len() != 3 || !currency.chars().all(|c| c.is_ascii_alphabetic()) {
                return Err(Error::Config(format!(
                    "defaults.currency must be a three-letter code (got {:?})",
                    currency
                )));
            }
            config.defaults.currency = currency.to_ascii_uppercase();
        }
        if let Some(months) = defaults.trend_months {
            config.defaults.trend_months = months.max(1);
        }
        if let Some(days) = defaults.upcoming_window_days {
            config.defaults.upcoming_window_days = days;
        }
        if let Some(days) = defaults.bucket_days_ahead {
            config.defaults.bucket_days_ahead = days;
        }
    }

    if let Some(engine) = raw.engine {
        if let Some(limit) = engine.step_limit {
            if limit == 0 {
                return Err(Error::Config("engine.step_limit must be greater than 0".into()));
            }
            config.engine.step_limit = limit;
        }
    }

    if let Some(reminders) = raw.reminders {
        config.reminders.database = reminders.database;
    }

    Ok(config)
}
