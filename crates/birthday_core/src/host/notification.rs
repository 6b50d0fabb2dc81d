//! Notification capability contract and request shape.
//!
//! # Invariants
//! - `trigger` matches month/day/hour/minute only; the year never repeats.
//! - `payload` is the only data the delivery side can recover.

use crate::host::capability::CapabilityError;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Sound played on delivery.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationSound {
    Default,
    Silent,
}

/// Calendar-matching trigger registered with the host scheduler.
///
/// `month`/`day` repeat every year as given. A Feb 29 birthday scheduled from
/// a non-leap year carries the leap-day policy's date (Feb 28 or Mar 1), and
/// that date also applies in later leap years.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarTrigger {
    pub month: u32,
    pub day: u32,
    pub hour: u32,
    pub minute: u32,
    pub repeats: bool,
}

/// Data attached to a reminder and handed back when the user opens it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationPayload {
    pub name: String,
    pub message: String,
}

/// Full registration request for one reminder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationRequest {
    pub id: String,
    pub title: String,
    pub body: String,
    pub sound: NotificationSound,
    pub payload: NotificationPayload,
    pub trigger: CalendarTrigger,
    /// Absolute first fire for platforms that need one.
    pub first_fire: NaiveDateTime,
}

/// Local notification scheduler provided by the host.
pub trait NotificationCapability {
    /// Registers `request`; replaces any pending request with the same id.
    fn add(&self, request: &NotificationRequest) -> Result<(), CapabilityError>;
}

impl NotificationPayload {
    /// Encodes the payload as the JSON user-info carried by the notification.
    pub fn to_user_info(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Decodes a delivered user-info JSON; both fields are required.
    pub fn from_user_info(user_info: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(user_info)
    }
}
