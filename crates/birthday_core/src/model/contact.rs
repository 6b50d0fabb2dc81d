//! Contact domain model.
//!
//! # Responsibility
//! - Define the canonical contact record and its message defaults.
//! - Convert partial birthday components into storable dates.
//!
//! # Invariants
//! - `uuid` is stable and never reused for another contact.
//! - `message` is never absent; it is empty or user/default text.
//! - Only month and day of `birthday` matter for recurrence.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::ops::RangeInclusive;
use uuid::Uuid;

/// Stable identifier for one contact record.
pub type ContactId = Uuid;

/// Message assigned to contacts created with a known birthday.
pub const DEFAULT_BIRTHDAY_MESSAGE: &str = "Happy Birthday!";

/// Year stored for birthdays whose source omits the year.
///
/// 1604 is a leap year, so a year-less Feb 29 stays representable.
pub const NO_YEAR_PLACEHOLDER: i32 = 1604;

/// Years the contact store can hold as a fixed-width `YYYY-MM-DD` date.
pub const STORABLE_YEARS: RangeInclusive<i32> = 0..=9999;

/// Canonical contact record owned by the contact store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contact {
    /// Stable ID used by UI edits and deterministic trigger identifiers.
    pub uuid: ContactId,
    /// Display name; also the unique merge key in the store.
    pub name: String,
    /// Birth date (or known anniversary). Year is not used for recurrence.
    pub birthday: Option<NaiveDate>,
    /// Reminder text offered when the notification fires.
    pub message: String,
}

impl Contact {
    /// Creates a contact with a generated ID and the default message for `birthday`.
    pub fn new(name: impl Into<String>, birthday: Option<NaiveDate>) -> Self {
        let message = default_message_for(birthday);
        Self::with_message(name, birthday, message)
    }

    /// Creates a contact with a generated ID and an explicit message.
    pub fn with_message(
        name: impl Into<String>,
        birthday: Option<NaiveDate>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            uuid: Uuid::new_v4(),
            name: name.into(),
            birthday,
            message: message.into(),
        }
    }

    /// Returns `(month, day)` of the birthday, if known.
    pub fn birthday_month_day(&self) -> Option<(u32, u32)> {
        self.birthday.map(|date| (date.month(), date.day()))
    }
}

/// Returns the initial message for a contact created with `birthday`.
pub fn default_message_for(birthday: Option<NaiveDate>) -> &'static str {
    if birthday.is_some() {
        DEFAULT_BIRTHDAY_MESSAGE
    } else {
        ""
    }
}

/// Birthday as stored by an address book: month/day with optional year.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BirthdayComponents {
    pub year: Option<i32>,
    pub month: u32,
    pub day: u32,
}

impl BirthdayComponents {
    pub fn new(year: Option<i32>, month: u32, day: u32) -> Self {
        Self { year, month, day }
    }

    /// Builds a calendar date, substituting `NO_YEAR_PLACEHOLDER` for a missing year.
    ///
    /// Returns `None` when the components do not name a real date or the
    /// year falls outside `STORABLE_YEARS`.
    pub fn to_date(self) -> Option<NaiveDate> {
        let year = self.year.unwrap_or(NO_YEAR_PLACEHOLDER);
        if !STORABLE_YEARS.contains(&year) {
            return None;
        }
        NaiveDate::from_ymd_opt(year, self.month, self.day)
    }
}

#[cfg(test)]
mod tests {
    use super::{default_message_for, BirthdayComponents, Contact, DEFAULT_BIRTHDAY_MESSAGE};
    use chrono::NaiveDate;

    #[test]
    fn new_contact_defaults_message_from_birthday_presence() {
        let date = NaiveDate::from_ymd_opt(1990, 6, 1);
        assert_eq!(Contact::new("A B", date).message, DEFAULT_BIRTHDAY_MESSAGE);
        assert_eq!(Contact::new("A B", None).message, "");
        assert_eq!(default_message_for(None), "");
    }

    #[test]
    fn new_contacts_get_distinct_ids() {
        assert_ne!(Contact::new("Same", None).uuid, Contact::new("Same", None).uuid);
    }

    #[test]
    fn yearless_leap_day_components_stay_representable() {
        let date = BirthdayComponents::new(None, 2, 29)
            .to_date()
            .expect("placeholder year is a leap year");
        assert_eq!(date, NaiveDate::from_ymd_opt(1604, 2, 29).unwrap());
    }

    #[test]
    fn impossible_components_yield_no_date() {
        assert!(BirthdayComponents::new(Some(2001), 2, 29).to_date().is_none());
        assert!(BirthdayComponents::new(Some(2001), 13, 1).to_date().is_none());
    }

    #[test]
    fn years_outside_storable_range_yield_no_date() {
        assert!(BirthdayComponents::new(Some(-1), 5, 5).to_date().is_none());
        assert!(BirthdayComponents::new(Some(10000), 5, 5).to_date().is_none());
        assert_eq!(
            BirthdayComponents::new(Some(9999), 12, 31).to_date(),
            NaiveDate::from_ymd_opt(9999, 12, 31)
        );
        assert_eq!(
            BirthdayComponents::new(Some(0), 1, 1).to_date(),
            NaiveDate::from_ymd_opt(0, 1, 1)
        );
    }

    #[test]
    fn month_day_ignores_year() {
        let contact = Contact::new("X", NaiveDate::from_ymd_opt(1975, 12, 25));
        assert_eq!(contact.birthday_month_day(), Some((12, 25)));
    }
}
