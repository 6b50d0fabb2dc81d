//! Calendar birthday-event importer.
//!
//! Birthday events follow the `"Birthday: <name>"` title convention. The name
//! is taken by dropping the first `BIRTHDAY_TITLE_DROP_CHARS` characters of the
//! title, one fewer than the prefix length, so extracted names keep a leading
//! space (`"Birthday: Bob"` -> `" Bob"`).

use crate::host::calendar::{CalendarCapability, CalendarEvent};
use crate::host::capability::{ensure_access, HostCapability};
use crate::import::{ImportError, ImportResult, ImportSource, ImportedBirthday};
use chrono::{Months, NaiveDateTime};
use log::info;

/// Title prefix marking a birthday event.
pub const BIRTHDAY_TITLE_PREFIX: &str = "Birthday: ";

/// Characters dropped from a matching title to get the name.
// TODO: confirm with calendar-sync users whether this should equal the prefix
// length (10); changing it renames every calendar-imported contact.
pub const BIRTHDAY_TITLE_DROP_CHARS: usize = 9;

const SCAN_WINDOW_MONTHS: u32 = 12;

/// Scans `[now, now + 1 year)` for birthday events.
///
/// # Errors
/// - `AccessDenied` when calendar access is denied, restricted or refused.
/// - `Fetch` when the access prompt or event query fails.
pub fn import_calendar(
    calendar: &impl CalendarCapability,
    now: NaiveDateTime,
) -> ImportResult<Vec<ImportedBirthday>> {
    let fetch_error = |error| ImportError::Fetch {
        source: ImportSource::Calendar,
        error,
    };

    if !ensure_access(calendar, HostCapability::Calendar).map_err(fetch_error)? {
        return Err(ImportError::AccessDenied(ImportSource::Calendar));
    }

    let (start, end) = scan_window(now);
    let events = calendar.events(start, end).map_err(fetch_error)?;
    let imported = events
        .iter()
        .filter_map(to_imported)
        .collect::<Vec<_>>();
    info!(
        "event=calendar_import module=import status=ok events={} birthdays={}",
        events.len(),
        imported.len()
    );
    Ok(imported)
}

/// Returns the half-open scan window starting at `now`.
pub fn scan_window(now: NaiveDateTime) -> (NaiveDateTime, NaiveDateTime) {
    let end = now
        .checked_add_months(Months::new(SCAN_WINDOW_MONTHS))
        .unwrap_or(NaiveDateTime::MAX);
    (now, end)
}

/// Extracts the contact name from a birthday event title.
///
/// Returns `None` for titles without the exact, case-sensitive prefix.
pub fn extract_birthday_name(title: &str) -> Option<String> {
    if !title.starts_with(BIRTHDAY_TITLE_PREFIX) {
        return None;
    }
    Some(title.chars().skip(BIRTHDAY_TITLE_DROP_CHARS).collect())
}

fn to_imported(event: &CalendarEvent) -> Option<ImportedBirthday> {
    extract_birthday_name(&event.title)
        .map(|name| ImportedBirthday::new(name, Some(event.start.date())))
}
