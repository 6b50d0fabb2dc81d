//! Core domain logic for Birthday Reminder.
//! This crate is the single source of truth for import, merge and scheduling rules.

pub mod config;
pub mod db;
pub mod host;
pub mod import;
pub mod logging;
pub mod model;
pub mod repo;
pub mod schedule;
pub mod service;

pub use config::{ConfigError, ReminderConfig, DB_PATH_ENV};
pub use host::calendar::{CalendarCapability, CalendarEvent};
pub use host::capability::{
    ensure_access, Authorizable, AuthorizationStatus, CapabilityError, HostCapability,
};
pub use host::contacts::{AddressBookEntry, ContactKey, ContactsCapability};
pub use host::notification::{
    CalendarTrigger, NotificationCapability, NotificationPayload, NotificationRequest,
    NotificationSound,
};
pub use import::address_book::{full_name, import_address_book};
pub use import::calendar::{extract_birthday_name, import_calendar};
pub use import::{ImportError, ImportResult, ImportSource, ImportedBirthday};
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::contact::{
    BirthdayComponents, Contact, ContactId, DEFAULT_BIRTHDAY_MESSAGE, STORABLE_YEARS,
};
pub use repo::contact_repo::{
    ContactListQuery, ContactRepository, RepoError, RepoResult, SqliteContactRepository,
    UpsertOutcome,
};
pub use schedule::next_occurrence::{next_occurrence, FireTime, InvalidDate, LeapDayPolicy};
pub use schedule::response::{ComposeRequest, ResponseError, ResponseHandler};
pub use schedule::scheduler::{
    build_request, NotificationScheduler, ScheduleOptions, ScheduleReport, TriggerIdentity,
};
pub use service::contact_service::{ContactService, ContactServiceError};
pub use service::reconcile_service::{ReconcileReport, ReconcileService, SourceOutcome};
pub use service::reminder_service::{RefreshReport, ReminderService};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
