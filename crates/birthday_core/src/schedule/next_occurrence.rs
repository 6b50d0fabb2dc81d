//! Next-occurrence calculator for yearly birthdays.
//!
//! # Invariants
//! - Only month and day of the birthday are used.
//! - A birthday falling on `today` is not pushed to next year.
//! - Feb 29 on a non-leap year is resolved by `LeapDayPolicy`, never an error
//!   for callers.

use chrono::{Datelike, NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Default local time of day reminders fire at.
pub const DEFAULT_FIRE_HOUR: u32 = 8;
pub const DEFAULT_FIRE_MINUTE: u32 = 0;

/// Validated hour/minute a reminder fires at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FireTime {
    hour: u32,
    minute: u32,
}

impl FireTime {
    pub fn new(hour: u32, minute: u32) -> Result<Self, InvalidFireTime> {
        if hour > 23 || minute > 59 {
            return Err(InvalidFireTime { hour, minute });
        }
        Ok(Self { hour, minute })
    }

    pub fn hour(self) -> u32 {
        self.hour
    }

    pub fn minute(self) -> u32 {
        self.minute
    }

    fn as_time(self) -> NaiveTime {
        NaiveTime::from_hms_opt(self.hour, self.minute, 0).unwrap_or(NaiveTime::MIN)
    }
}

impl Default for FireTime {
    fn default() -> Self {
        Self {
            hour: DEFAULT_FIRE_HOUR,
            minute: DEFAULT_FIRE_MINUTE,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidFireTime {
    pub hour: u32,
    pub minute: u32,
}

impl Display for InvalidFireTime {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "invalid fire time {:02}:{:02}; expected hour 0-23 and minute 0-59",
            self.hour, self.minute
        )
    }
}

impl Error for InvalidFireTime {}

/// Resolution for Feb 29 birthdays in non-leap years.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LeapDayPolicy {
    #[default]
    ClampToFeb28,
    ShiftToMar1,
}

/// Month/day that does not exist in the requested year.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidDate {
    pub year: i32,
    pub month: u32,
    pub day: u32,
}

impl Display for InvalidDate {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{:04}-{:02}-{:02} is not a valid date",
            self.year, self.month, self.day
        )
    }
}

impl Error for InvalidDate {}

/// Builds `year-month-day` without policy; fails for Feb 29 in non-leap years.
pub fn anniversary_in_year(birthday: NaiveDate, year: i32) -> Result<NaiveDate, InvalidDate> {
    NaiveDate::from_ymd_opt(year, birthday.month(), birthday.day()).ok_or(InvalidDate {
        year,
        month: birthday.month(),
        day: birthday.day(),
    })
}

/// Builds the birthday's date in `year`, resolving a missing Feb 29 by `policy`.
pub fn resolve_anniversary(birthday: NaiveDate, year: i32, policy: LeapDayPolicy) -> NaiveDate {
    match anniversary_in_year(birthday, year) {
        Ok(date) => date,
        Err(invalid) => {
            let (month, day) = match policy {
                LeapDayPolicy::ClampToFeb28 => (2, 28),
                LeapDayPolicy::ShiftToMar1 => (3, 1),
            };
            NaiveDate::from_ymd_opt(invalid.year, month, day).unwrap_or(NaiveDate::MAX)
        }
    }
}

/// Computes when the reminder for `birthday` first fires, relative to `today`.
///
/// The year is `today`'s year, or the next one when the birthday's month/day
/// is strictly earlier than today's. The time of day is `fire_time`, seconds 0.
pub fn next_occurrence(
    birthday: NaiveDate,
    today: NaiveDate,
    fire_time: FireTime,
    policy: LeapDayPolicy,
) -> NaiveDateTime {
    let mut year = today.year();
    if (birthday.month(), birthday.day()) < (today.month(), today.day()) {
        year += 1;
    }
    resolve_anniversary(birthday, year, policy).and_time(fire_time.as_time())
}

#[cfg(test)]
mod tests {
    use super::{
        anniversary_in_year, next_occurrence, resolve_anniversary, FireTime, LeapDayPolicy,
    };
    use chrono::{Datelike, NaiveDate, Timelike};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn fire_time_rejects_out_of_range_values() {
        assert!(FireTime::new(24, 0).is_err());
        assert!(FireTime::new(0, 60).is_err());
        let time = FireTime::new(23, 59).unwrap();
        assert_eq!((time.hour(), time.minute()), (23, 59));
    }

    #[test]
    fn default_fire_time_is_eight_am() {
        let fire = next_occurrence(
            date(1990, 12, 25),
            date(2024, 3, 1),
            FireTime::default(),
            LeapDayPolicy::default(),
        );
        assert_eq!((fire.hour(), fire.minute(), fire.second()), (8, 0, 0));
    }

    #[test]
    fn leap_day_resolution_follows_policy() {
        let birthday = date(2000, 2, 29);
        assert!(anniversary_in_year(birthday, 2025).is_err());
        assert_eq!(
            resolve_anniversary(birthday, 2025, LeapDayPolicy::ClampToFeb28),
            date(2025, 2, 28)
        );
        assert_eq!(
            resolve_anniversary(birthday, 2025, LeapDayPolicy::ShiftToMar1),
            date(2025, 3, 1)
        );
        assert_eq!(
            resolve_anniversary(birthday, 2028, LeapDayPolicy::ShiftToMar1),
            date(2028, 2, 29)
        );
    }

    #[test]
    fn year_boundary_rolls_over() {
        let fire = next_occurrence(
            date(1980, 1, 1),
            date(2024, 12, 31),
            FireTime::default(),
            LeapDayPolicy::default(),
        );
        assert_eq!(fire.date(), date(2025, 1, 1));
        assert_eq!(fire.year(), 2025);
    }
}
