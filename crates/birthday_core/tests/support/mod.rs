//! Fake host capabilities shared by integration tests.
#![allow(dead_code)]

use birthday_core::{
    AddressBookEntry, Authorizable, AuthorizationStatus, BirthdayComponents, CalendarCapability,
    CalendarEvent, CapabilityError, ContactKey, ContactsCapability, HostCapability,
    NotificationCapability, NotificationRequest,
};
use chrono::{NaiveDate, NaiveDateTime};
use std::cell::{Cell, RefCell};

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn at(y: i32, m: u32, d: u32, hour: u32, minute: u32) -> NaiveDateTime {
    date(y, m, d).and_hms_opt(hour, minute, 0).unwrap()
}

pub struct FakeContacts {
    pub status: AuthorizationStatus,
    pub grant_on_request: bool,
    pub entries: Vec<AddressBookEntry>,
    pub fail_enumerate: bool,
    pub prompts: Cell<u32>,
    pub requested_keys: RefCell<Vec<ContactKey>>,
}

impl FakeContacts {
    pub fn authorized(entries: Vec<AddressBookEntry>) -> Self {
        Self {
            status: AuthorizationStatus::Authorized,
            grant_on_request: false,
            entries,
            fail_enumerate: false,
            prompts: Cell::new(0),
            requested_keys: RefCell::new(Vec::new()),
        }
    }

    pub fn with_status(status: AuthorizationStatus, entries: Vec<AddressBookEntry>) -> Self {
        Self {
            status,
            ..Self::authorized(entries)
        }
    }

    pub fn denied() -> Self {
        Self::with_status(AuthorizationStatus::Denied, Vec::new())
    }
}

impl Authorizable for FakeContacts {
    fn authorization_status(&self) -> AuthorizationStatus {
        self.status
    }

    fn request_access(&self) -> Result<bool, CapabilityError> {
        self.prompts.set(self.prompts.get() + 1);
        Ok(self.grant_on_request)
    }
}

impl ContactsCapability for FakeContacts {
    fn enumerate(&self, keys: &[ContactKey]) -> Result<Vec<AddressBookEntry>, CapabilityError> {
        self.requested_keys.borrow_mut().extend_from_slice(keys);
        if self.fail_enumerate {
            return Err(CapabilityError::new(
                HostCapability::Contacts,
                "enumeration failed",
            ));
        }
        Ok(self.entries.clone())
    }
}

pub fn entry(given: &str, family: &str, birthday: Option<(i32, u32, u32)>) -> AddressBookEntry {
    AddressBookEntry {
        given_name: given.to_string(),
        family_name: family.to_string(),
        birthday: birthday.map(|(y, m, d)| BirthdayComponents::new(Some(y), m, d)),
    }
}

pub struct FakeCalendar {
    pub status: AuthorizationStatus,
    pub grant_on_request: bool,
    pub events: Vec<CalendarEvent>,
    pub fail_query: bool,
    pub queried_window: RefCell<Option<(NaiveDateTime, NaiveDateTime)>>,
}

impl FakeCalendar {
    pub fn authorized(events: Vec<CalendarEvent>) -> Self {
        Self {
            status: AuthorizationStatus::Authorized,
            grant_on_request: false,
            events,
            fail_query: false,
            queried_window: RefCell::new(None),
        }
    }

    pub fn denied() -> Self {
        Self {
            status: AuthorizationStatus::Denied,
            ..Self::authorized(Vec::new())
        }
    }
}

impl Authorizable for FakeCalendar {
    fn authorization_status(&self) -> AuthorizationStatus {
        self.status
    }

    fn request_access(&self) -> Result<bool, CapabilityError> {
        Ok(self.grant_on_request)
    }
}

impl CalendarCapability for FakeCalendar {
    fn events(
        &self,
        start: NaiveDateTime,
        end: NaiveDateTime,
    ) -> Result<Vec<CalendarEvent>, CapabilityError> {
        *self.queried_window.borrow_mut() = Some((start, end));
        if self.fail_query {
            return Err(CapabilityError::new(HostCapability::Calendar, "query failed"));
        }
        Ok(self.events.clone())
    }
}

pub fn event(title: &str, start: NaiveDateTime) -> CalendarEvent {
    CalendarEvent {
        title: title.to_string(),
        start,
    }
}

/// Records accepted requests; rejects requests whose payload name is listed.
#[derive(Default)]
pub struct RecordingNotifier {
    pub accepted: RefCell<Vec<NotificationRequest>>,
    pub reject_names: Vec<String>,
    pub attempts: Cell<u32>,
}

impl RecordingNotifier {
    pub fn rejecting(names: &[&str]) -> Self {
        Self {
            reject_names: names.iter().map(|name| name.to_string()).collect(),
            ..Self::default()
        }
    }
}

impl NotificationCapability for RecordingNotifier {
    fn add(&self, request: &NotificationRequest) -> Result<(), CapabilityError> {
        self.attempts.set(self.attempts.get() + 1);
        if self.reject_names.contains(&request.payload.name) {
            return Err(CapabilityError::new(
                HostCapability::Notification,
                "registration rejected",
            ));
        }
        self.accepted.borrow_mut().push(request.clone());
        Ok(())
    }
}
