//! FFI use-case API for Flutter-facing calls.
//!
//! # Responsibility
//! - Expose stable, use-case-level functions to Dart via FRB.
//! - Adapt host snapshots (permission state, contacts, events) to core capabilities.
//!
//! # Invariants
//! - Exported functions must not panic across the FFI boundary.
//! - Errors are reported in response envelopes, never thrown.
//! - Permission prompts happen on the Dart side before calling in; a
//!   `not_determined` status is treated as not granted.

use birthday_core::db::open_db;
use birthday_core::{
    core_version as core_version_inner, init_logging as init_logging_inner, ping as ping_inner,
    AddressBookEntry, Authorizable, AuthorizationStatus, BirthdayComponents, CalendarCapability,
    CalendarEvent, CapabilityError, Contact, ContactKey, ContactService, ContactsCapability,
    HostCapability, NotificationCapability, NotificationRequest, NotificationScheduler,
    ReconcileService, ReminderConfig, ResponseHandler, SourceOutcome, SqliteContactRepository,
    DB_PATH_ENV, STORABLE_YEARS,
};
use chrono::{DateTime, Datelike, Local, NaiveDate, NaiveDateTime, TimeZone};
use log::warn;
use rusqlite::Connection;
use std::cell::RefCell;
use std::path::PathBuf;
use std::sync::OnceLock;
use uuid::Uuid;

const DB_FILE_NAME: &str = "birthday_reminder.sqlite3";
const BIRTHDAY_ISO_FORMAT: &str = "%Y-%m-%d";
static DB_PATH: OnceLock<PathBuf> = OnceLock::new();

/// Minimal health-check API for FRB smoke integration.
#[flutter_rust_bridge::frb(sync)]
pub fn ping() -> String {
    ping_inner().to_owned()
}

/// Expose core crate version through FFI.
#[flutter_rust_bridge::frb(sync)]
pub fn core_version() -> String {
    core_version_inner().to_owned()
}

/// Initializes Rust core logging once per process.
///
/// # FFI contract
/// - `level`: one of `trace|debug|info|warn|error` (case-insensitive).
/// - `log_dir`: absolute directory for rolling log files.
/// - Returns empty string on success and an error message on failure.
#[flutter_rust_bridge::frb(sync)]
pub fn init_logging(level: String, log_dir: String) -> String {
    match init_logging_inner(level.as_str(), log_dir.as_str()) {
        Ok(()) => String::new(),
        Err(err) => err.to_string(),
    }
}

/// One address-book record captured by the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddressBookContactDto {
    pub given_name: String,
    pub family_name: String,
    pub birthday_year: Option<i32>,
    pub birthday_month: Option<u32>,
    pub birthday_day: Option<u32>,
}

/// One calendar event captured by the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalendarEventDto {
    pub title: String,
    pub start_epoch_ms: i64,
}

/// Snapshot of both import sources.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportRequest {
    /// `authorized|not_determined|denied|restricted`.
    pub contacts_status: String,
    pub contacts: Vec<AddressBookContactDto>,
    pub calendar_status: String,
    pub calendar_events: Vec<CalendarEventDto>,
    pub now_epoch_ms: i64,
}

/// Reconciliation summary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportResponse {
    pub ok: bool,
    pub message: String,
    /// `imported|access_denied|fetch_failed|skipped`.
    pub address_book: String,
    pub calendar: String,
    pub created: u32,
    pub updated: u32,
    pub unchanged: u32,
    pub failed: u32,
}

impl ImportResponse {
    fn failure(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            message: message.into(),
            address_book: source_label(SourceOutcome::Skipped).to_string(),
            calendar: source_label(SourceOutcome::Skipped).to_string(),
            created: 0,
            updated: 0,
            unchanged: 0,
            failed: 0,
        }
    }
}

/// Contact row for list/detail screens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactItem {
    pub contact_id: String,
    pub name: String,
    /// `YYYY-MM-DD` or `None` when missing.
    pub birthday: Option<String>,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactListResponse {
    pub ok: bool,
    pub items: Vec<ContactItem>,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactActionResponse {
    pub ok: bool,
    pub item: Option<ContactItem>,
    pub message: String,
}

impl ContactActionResponse {
    fn failure(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            item: None,
            message: message.into(),
        }
    }
}

/// One notification the host should register.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationPlanItem {
    pub id: String,
    pub title: String,
    pub body: String,
    /// JSON user-info `{name, message}` to attach to the notification.
    pub payload_json: String,
    pub month: u32,
    pub day: u32,
    pub hour: u32,
    pub minute: u32,
    pub repeats: bool,
    pub first_fire_epoch_ms: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationPlanResponse {
    pub ok: bool,
    pub items: Vec<NotificationPlanItem>,
    pub skipped_without_birthday: u32,
    pub message: String,
}

impl NotificationPlanResponse {
    fn failure(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            items: Vec::new(),
            skipped_without_birthday: 0,
            message: message.into(),
        }
    }
}

/// Text-composition request recovered from an opened reminder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComposeResponse {
    pub ok: bool,
    pub name: String,
    pub text: String,
    pub message: String,
}

/// Merges host contacts and calendar events into the contact store.
///
/// # FFI contract
/// - Sync call, DB-backed execution; run off the UI thread.
/// - Do not call concurrently; one reconciliation pass at a time.
#[flutter_rust_bridge::frb(sync)]
pub fn contacts_import(request: ImportRequest) -> ImportResponse {
    let Some(now) = local_from_epoch_ms(request.now_epoch_ms) else {
        return ImportResponse::failure("contacts_import failed: invalid now_epoch_ms");
    };
    let contacts = SnapshotContacts::from_request(&request);
    let calendar = SnapshotCalendar::from_request(&request);

    let conn = match open_store() {
        Ok(conn) => conn,
        Err(err) => return ImportResponse::failure(format!("contacts_import failed: {err}")),
    };
    let service = ReconcileService::new(SqliteContactRepository::new(&conn));
    let report = service.reconcile(&contacts, &calendar, now);

    ImportResponse {
        ok: true,
        message: format!(
            "Created {}, updated {}, failed {}.",
            report.created, report.birthdays_updated, report.failed
        ),
        address_book: source_label(report.address_book).to_string(),
        calendar: source_label(report.calendar).to_string(),
        created: report.created,
        updated: report.birthdays_updated,
        unchanged: report.unchanged,
        failed: report.failed,
    }
}

/// Lists stored contacts, optionally filtered by a case-sensitive name substring.
#[flutter_rust_bridge::frb(sync)]
pub fn contacts_list(search: Option<String>) -> ContactListResponse {
    let result = open_store().and_then(|conn| {
        ContactService::new(SqliteContactRepository::new(&conn))
            .list(search.as_deref())
            .map_err(|err| err.to_string())
    });
    match result {
        Ok(contacts) => {
            let items = contacts.iter().map(to_contact_item).collect::<Vec<_>>();
            let message = if items.is_empty() {
                "No contacts.".to_string()
            } else {
                format!("Found {} contact(s).", items.len())
            };
            ContactListResponse {
                ok: true,
                items,
                message,
            }
        }
        Err(err) => ContactListResponse {
            ok: false,
            items: Vec::new(),
            message: format!("contacts_list failed: {err}"),
        },
    }
}

/// Saves the edit sheet for one contact.
///
/// `birthday` is `YYYY-MM-DD`; `None` clears the birthday.
#[flutter_rust_bridge::frb(sync)]
pub fn contact_update(
    contact_id: String,
    message: String,
    birthday: Option<String>,
) -> ContactActionResponse {
    let Ok(id) = Uuid::parse_str(contact_id.trim()) else {
        return ContactActionResponse::failure("contact_update failed: invalid contact_id");
    };
    let birthday = match birthday.as_deref().map(str::trim) {
        None | Some("") => None,
        Some(value) => match NaiveDate::parse_from_str(value, BIRTHDAY_ISO_FORMAT) {
            Ok(date) if STORABLE_YEARS.contains(&date.year()) => Some(date),
            _ => {
                return ContactActionResponse::failure(
                    "contact_update failed: birthday must be YYYY-MM-DD",
                )
            }
        },
    };

    let result = open_store().and_then(|conn| {
        ContactService::new(SqliteContactRepository::new(&conn))
            .update_details(id, message, birthday)
            .map_err(|err| err.to_string())
    });
    match result {
        Ok(contact) => ContactActionResponse {
            ok: true,
            item: Some(to_contact_item(&contact)),
            message: "Contact updated.".to_string(),
        },
        Err(err) => ContactActionResponse::failure(format!("contact_update failed: {err}")),
    }
}

/// Builds the reminder registrations the host should add.
///
/// `config_json` is an optional `ReminderConfig` JSON; blank uses defaults.
#[flutter_rust_bridge::frb(sync)]
pub fn notifications_plan(now_epoch_ms: i64, config_json: Option<String>) -> NotificationPlanResponse {
    let Some(now) = local_from_epoch_ms(now_epoch_ms) else {
        return NotificationPlanResponse::failure("notifications_plan failed: invalid now_epoch_ms");
    };
    let options = match ReminderConfig::from_json(config_json.as_deref().unwrap_or(""))
        .and_then(|config| config.schedule_options())
    {
        Ok(options) => options,
        Err(err) => {
            return NotificationPlanResponse::failure(format!("notifications_plan failed: {err}"))
        }
    };

    let planner = PlanCollector::default();
    let result = open_store().and_then(|conn| {
        NotificationScheduler::new(options)
            .schedule_all(&SqliteContactRepository::new(&conn), &planner, now.date())
            .map_err(|err| err.to_string())
    });
    match result {
        Ok(report) => {
            let items = planner.requests.into_inner();
            NotificationPlanResponse {
                ok: true,
                message: format!("Planned {} reminder(s).", items.len()),
                items,
                skipped_without_birthday: report.skipped_without_birthday,
            }
        }
        Err(err) => NotificationPlanResponse::failure(format!("notifications_plan failed: {err}")),
    }
}

/// Decodes the user-info of an opened reminder into a compose request.
#[flutter_rust_bridge::frb(sync)]
pub fn notification_response(user_info: String) -> ComposeResponse {
    let (handler, receiver) = ResponseHandler::channel();
    let delivered = handler
        .handle_user_info(&user_info)
        .map_err(|err| err.to_string())
        .and_then(|()| receiver.try_recv().map_err(|err| err.to_string()));
    match delivered {
        Ok(request) => ComposeResponse {
            ok: true,
            name: request.name,
            text: request.message,
            message: String::new(),
        },
        Err(err) => ComposeResponse {
            ok: false,
            name: String::new(),
            text: String::new(),
            message: format!("notification_response failed: {err}"),
        },
    }
}

struct SnapshotContacts {
    status: AuthorizationStatus,
    entries: Vec<AddressBookEntry>,
}

impl SnapshotContacts {
    fn from_request(request: &ImportRequest) -> Self {
        Self {
            status: AuthorizationStatus::parse_lenient(&request.contacts_status),
            entries: request.contacts.iter().map(to_address_book_entry).collect(),
        }
    }
}

impl Authorizable for SnapshotContacts {
    fn authorization_status(&self) -> AuthorizationStatus {
        self.status
    }

    fn request_access(&self) -> Result<bool, CapabilityError> {
        Ok(false)
    }
}

impl ContactsCapability for SnapshotContacts {
    fn enumerate(&self, _keys: &[ContactKey]) -> Result<Vec<AddressBookEntry>, CapabilityError> {
        Ok(self.entries.clone())
    }
}

struct SnapshotCalendar {
    status: AuthorizationStatus,
    events: Vec<CalendarEvent>,
}

impl SnapshotCalendar {
    fn from_request(request: &ImportRequest) -> Self {
        let events = request
            .calendar_events
            .iter()
            .filter_map(|dto| match local_from_epoch_ms(dto.start_epoch_ms) {
                Some(start) => Some(CalendarEvent {
                    title: dto.title.clone(),
                    start,
                }),
                None => {
                    warn!(
                        "event=ffi_import module=ffi status=degraded error_code=invalid_event_start"
                    );
                    None
                }
            })
            .collect();
        Self {
            status: AuthorizationStatus::parse_lenient(&request.calendar_status),
            events,
        }
    }
}

impl Authorizable for SnapshotCalendar {
    fn authorization_status(&self) -> AuthorizationStatus {
        self.status
    }

    fn request_access(&self) -> Result<bool, CapabilityError> {
        Ok(false)
    }
}

impl CalendarCapability for SnapshotCalendar {
    fn events(
        &self,
        start: NaiveDateTime,
        end: NaiveDateTime,
    ) -> Result<Vec<CalendarEvent>, CapabilityError> {
        Ok(self
            .events
            .iter()
            .filter(|event| event.start >= start && event.start < end)
            .cloned()
            .collect())
    }
}

#[derive(Default)]
struct PlanCollector {
    requests: RefCell<Vec<NotificationPlanItem>>,
}

impl NotificationCapability for PlanCollector {
    fn add(&self, request: &NotificationRequest) -> Result<(), CapabilityError> {
        let payload_json = request.payload.to_user_info().map_err(|err| {
            CapabilityError::new(HostCapability::Notification, err.to_string())
        })?;
        self.requests.borrow_mut().push(NotificationPlanItem {
            id: request.id.clone(),
            title: request.title.clone(),
            body: request.body.clone(),
            payload_json,
            month: request.trigger.month,
            day: request.trigger.day,
            hour: request.trigger.hour,
            minute: request.trigger.minute,
            repeats: request.trigger.repeats,
            first_fire_epoch_ms: epoch_ms_from_local(request.first_fire),
        });
        Ok(())
    }
}

fn to_address_book_entry(dto: &AddressBookContactDto) -> AddressBookEntry {
    let birthday = match (dto.birthday_month, dto.birthday_day) {
        (Some(month), Some(day)) => Some(BirthdayComponents::new(dto.birthday_year, month, day)),
        _ => None,
    };
    AddressBookEntry {
        given_name: dto.given_name.clone(),
        family_name: dto.family_name.clone(),
        birthday,
    }
}

fn to_contact_item(contact: &Contact) -> ContactItem {
    ContactItem {
        contact_id: contact.uuid.to_string(),
        name: contact.name.clone(),
        birthday: contact
            .birthday
            .map(|date| date.format(BIRTHDAY_ISO_FORMAT).to_string()),
        message: contact.message.clone(),
    }
}

fn source_label(outcome: SourceOutcome) -> &'static str {
    match outcome {
        SourceOutcome::Skipped => "skipped",
        SourceOutcome::Imported { .. } => "imported",
        SourceOutcome::AccessDenied => "access_denied",
        SourceOutcome::FetchFailed => "fetch_failed",
    }
}

fn local_from_epoch_ms(epoch_ms: i64) -> Option<NaiveDateTime> {
    DateTime::from_timestamp_millis(epoch_ms).map(|utc| utc.with_timezone(&Local).naive_local())
}

fn epoch_ms_from_local(local: NaiveDateTime) -> Option<i64> {
    Local
        .from_local_datetime(&local)
        .earliest()
        .map(|dt| dt.timestamp_millis())
}

fn resolve_db_path() -> PathBuf {
    DB_PATH
        .get_or_init(|| {
            if let Ok(raw) = std::env::var(DB_PATH_ENV) {
                let trimmed = raw.trim();
                if !trimmed.is_empty() {
                    return PathBuf::from(trimmed);
                }
            }
            std::env::temp_dir().join(DB_FILE_NAME)
        })
        .clone()
}

fn open_store() -> Result<Connection, String> {
    open_db(resolve_db_path()).map_err(|err| format!("contact store open failed: {err}"))
}
