//! Coercion configuration
//!
//! The textual timestamp layout and the zone it is read in. A config value is
//! handed to the fetcher at construction; there is no global layout.

use std::env;
use std::fmt;
use std::str::FromStr;

use chrono::format::{Item, StrftimeItems};
use chrono::{DateTime, Duration, FixedOffset, Local, LocalResult, NaiveDateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Layout used when none is configured
pub const DEFAULT_TIME_LAYOUT: &str = "%Y-%m-%d %H:%M:%S";

/// Zone in which textual timestamps without an offset are interpreted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum TimeZoneSetting {
    #[default]
    Local,
    Utc,
    Fixed(FixedOffset),
}

impl TimeZoneSetting {
    /// Resolve a wall-clock time read in this zone to an instant.
    ///
    /// A local time skipped by a daylight-saving jump is moved forward by an
    /// hour; an ambiguous one resolves to the earlier instant.
    pub fn resolve(&self, naive: &NaiveDateTime) -> Option<DateTime<Utc>> {
        match self {
            TimeZoneSetting::Utc => Some(Utc.from_utc_datetime(naive)),
            TimeZoneSetting::Local => resolve_forward(naive, |n| Local.from_local_datetime(n)),
            TimeZoneSetting::Fixed(offset) => offset
                .from_local_datetime(naive)
                .single()
                .map(|dt| dt.with_timezone(&Utc)),
        }
    }

    /// The wall-clock time of `instant` as seen in this zone
    pub fn wall_clock(&self, instant: &DateTime<Utc>) -> NaiveDateTime {
        match self {
            TimeZoneSetting::Utc => instant.naive_utc(),
            TimeZoneSetting::Local => instant.with_timezone(&Local).naive_local(),
            TimeZoneSetting::Fixed(offset) => instant.with_timezone(offset).naive_local(),
        }
    }
}

fn resolve_forward<Tz, F>(naive: &NaiveDateTime, lookup: F) -> Option<DateTime<Utc>>
where
    Tz: TimeZone,
    F: Fn(&NaiveDateTime) -> LocalResult<DateTime<Tz>>,
{
    let resolved = match lookup(naive) {
        LocalResult::None => {
            let shifted = naive.checked_add_signed(Duration::hours(1))?;
            lookup(&shifted).earliest()
        }
        found => found.earliest(),
    };

    resolved.map(|dt| dt.with_timezone(&Utc))
}

impl FromStr for TimeZoneSetting {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "local" => Ok(TimeZoneSetting::Local),
            "utc" | "z" => Ok(TimeZoneSetting::Utc),
            other => other
                .parse::<FixedOffset>()
                .map(TimeZoneSetting::Fixed)
                .map_err(|_| ConfigError::InvalidValue {
                    field: "time_zone".to_string(),
                    value: s.to_string(),
                    expected: "local, utc, or an offset such as +08:00".to_string(),
                }),
        }
    }
}

impl fmt::Display for TimeZoneSetting {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TimeZoneSetting::Local => write!(f, "local"),
            TimeZoneSetting::Utc => write!(f, "utc"),
            TimeZoneSetting::Fixed(offset) => write!(f, "{}", offset),
        }
    }
}

impl TryFrom<String> for TimeZoneSetting {
    type Error = ConfigError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<TimeZoneSetting> for String {
    fn from(zone: TimeZoneSetting) -> Self {
        zone.to_string()
    }
}

/// Configuration for temporal coercion
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CoercionConfig {
    /// chrono strftime layout for textual timestamps
    pub time_layout: String,
    pub time_zone: TimeZoneSetting,
}

impl Default for CoercionConfig {
    fn default() -> Self {
        Self {
            time_layout: DEFAULT_TIME_LAYOUT.to_string(),
            time_zone: TimeZoneSetting::Local,
        }
    }
}

impl CoercionConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_time_layout(mut self, layout: impl Into<String>) -> Self {
        self.time_layout = layout.into();
        self
    }

    pub fn with_time_zone(mut self, zone: TimeZoneSetting) -> Self {
        self.time_zone = zone;
        self
    }

    /// Load configuration from `XSQL_TIME_LAYOUT` and `XSQL_TIME_ZONE`,
    /// falling back to the defaults for unset variables
    pub fn from_env() -> Result<Self, ConfigError> {
        let time_layout = get_env_or_default("XSQL_TIME_LAYOUT", DEFAULT_TIME_LAYOUT);
        let time_zone = get_env_or_default("XSQL_TIME_ZONE", "local");
        let time_zone = TimeZoneSetting::from_str(&time_zone)?;

        let config = CoercionConfig {
            time_layout,
            time_zone,
        };
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.time_layout.is_empty() {
            return Err(ConfigError::ValidationFailed {
                field: "time_layout".to_string(),
                reason: "Time layout cannot be empty".to_string(),
            });
        }

        if StrftimeItems::new(&self.time_layout).any(|item| matches!(item, Item::Error)) {
            return Err(ConfigError::InvalidValue {
                field: "time_layout".to_string(),
                value: self.time_layout.clone(),
                expected: "a chrono strftime layout".to_string(),
            });
        }

        Ok(())
    }
}

fn get_env_or_default(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}
