//! Reminder configuration.
//!
//! # Responsibility
//! - Parse host-provided JSON settings with defaults for every field.
//! - Validate values before they reach the scheduler.
//!
//! # Invariants
//! - A missing field means "use the default", never "disable".
//! - Invalid settings are rejected as a whole; nothing is partially applied.

use crate::schedule::next_occurrence::{
    FireTime, InvalidFireTime, LeapDayPolicy, DEFAULT_FIRE_HOUR, DEFAULT_FIRE_MINUTE,
};
use crate::schedule::scheduler::{ScheduleOptions, TriggerIdentity};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Environment variable overriding the contact store location.
pub const DB_PATH_ENV: &str = "BIRTHDAY_REMINDER_DB_PATH";

/// User-tunable reminder settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ReminderConfig {
    pub fire_hour: u32,
    pub fire_minute: u32,
    pub leap_day_policy: LeapDayPolicy,
    pub trigger_identity: TriggerIdentity,
}

impl Default for ReminderConfig {
    fn default() -> Self {
        Self {
            fire_hour: DEFAULT_FIRE_HOUR,
            fire_minute: DEFAULT_FIRE_MINUTE,
            leap_day_policy: LeapDayPolicy::default(),
            trigger_identity: TriggerIdentity::default(),
        }
    }
}

impl ReminderConfig {
    /// Parses and validates a JSON config; blank input yields defaults.
    pub fn from_json(raw: &str) -> Result<Self, ConfigError> {
        if raw.trim().is_empty() {
            return Ok(Self::default());
        }
        let config: Self = serde_json::from_str(raw).map_err(ConfigError::Parse)?;
        config.schedule_options()?;
        Ok(config)
    }

    /// Resolves validated scheduler options.
    pub fn schedule_options(&self) -> Result<ScheduleOptions, ConfigError> {
        let fire_time =
            FireTime::new(self.fire_hour, self.fire_minute).map_err(ConfigError::FireTime)?;
        Ok(ScheduleOptions {
            fire_time,
            leap_day_policy: self.leap_day_policy,
            trigger_identity: self.trigger_identity,
        })
    }
}

#[derive(Debug)]
pub enum ConfigError {
    Parse(serde_json::Error),
    FireTime(InvalidFireTime),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Parse(err) => write!(f, "invalid reminder config: {err}"),
            Self::FireTime(err) => write!(f, "invalid reminder config: {err}"),
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Parse(err) => Some(err),
            Self::FireTime(err) => Some(err),
        }
    }
}
