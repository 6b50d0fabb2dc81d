//! Calendar capability contract.

use crate::host::capability::{Authorizable, CapabilityError};
use chrono::NaiveDateTime;

/// One calendar event as seen by the importer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalendarEvent {
    pub title: String,
    pub start: NaiveDateTime,
}

/// Read access to the platform calendar.
pub trait CalendarCapability: Authorizable {
    /// Returns events starting in `[start, end)`.
    fn events(
        &self,
        start: NaiveDateTime,
        end: NaiveDateTime,
    ) -> Result<Vec<CalendarEvent>, CapabilityError>;
}
