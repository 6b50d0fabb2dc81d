//! Notification scheduler.
//!
//! # Responsibility
//! - Build one recurring registration per contact with a birthday.
//! - Delegate delivery to the host notification capability.
//!
//! # Invariants
//! - Trigger month/day come from `next_occurrence`, never from raw birthday fields.
//! - A rejected registration is logged and does not stop the remaining contacts.
//! - With `TriggerIdentity::Fresh`, repeated runs register duplicate triggers.

use crate::host::notification::{
    CalendarTrigger, NotificationCapability, NotificationPayload, NotificationRequest,
    NotificationSound,
};
use crate::model::contact::Contact;
use crate::repo::contact_repo::{ContactRepository, RepoResult};
use crate::schedule::next_occurrence::{next_occurrence, FireTime, LeapDayPolicy};
use chrono::{Datelike, NaiveDate, Timelike};
use log::{error, info, warn};
use serde::{Deserialize, Serialize};
use std::time::Instant;
use uuid::Uuid;

pub const REMINDER_TITLE: &str = "Birthday Reminder";

const PER_CONTACT_ID_PREFIX: &str = "birthday-";

/// How registration identifiers are generated.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TriggerIdentity {
    /// New random id on every registration.
    #[default]
    Fresh,
    /// `birthday-<contact uuid>`; re-registering replaces the pending trigger.
    PerContact,
}

/// Scheduling knobs resolved from configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScheduleOptions {
    pub fire_time: FireTime,
    pub leap_day_policy: LeapDayPolicy,
    pub trigger_identity: TriggerIdentity,
}

/// Outcome counters of one scheduling pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScheduleReport {
    pub scheduled: u32,
    pub skipped_without_birthday: u32,
    pub failed: u32,
    /// Ids accepted by the notification capability, in registration order.
    pub registered_ids: Vec<String>,
}

/// Body text shown for `name`'s reminder.
pub fn reminder_body(name: &str) -> String {
    format!("It's {name}'s birthday today!")
}

/// Builds the registration for `contact`, or `None` when it has no birthday.
///
/// The trigger repeats on the first fire's month/day. For a Feb 29 birthday
/// scheduled from a non-leap year that is the leap-day policy's date, and the
/// trigger keeps firing on it in later leap years too.
pub fn build_request(
    contact: &Contact,
    today: NaiveDate,
    options: &ScheduleOptions,
) -> Option<NotificationRequest> {
    let birthday = contact.birthday?;
    let first_fire = next_occurrence(
        birthday,
        today,
        options.fire_time,
        options.leap_day_policy,
    );
    let id = match options.trigger_identity {
        TriggerIdentity::Fresh => Uuid::new_v4().to_string(),
        TriggerIdentity::PerContact => format!("{PER_CONTACT_ID_PREFIX}{}", contact.uuid),
    };

    Some(NotificationRequest {
        id,
        title: REMINDER_TITLE.to_string(),
        body: reminder_body(&contact.name),
        sound: NotificationSound::Default,
        payload: NotificationPayload {
            name: contact.name.clone(),
            message: contact.message.clone(),
        },
        trigger: CalendarTrigger {
            month: first_fire.month(),
            day: first_fire.day(),
            hour: first_fire.hour(),
            minute: first_fire.minute(),
            repeats: true,
        },
        first_fire,
    })
}

/// Registers yearly reminders for stored contacts.
#[derive(Debug, Clone, Default)]
pub struct NotificationScheduler {
    options: ScheduleOptions,
}

impl NotificationScheduler {
    pub fn new(options: ScheduleOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &ScheduleOptions {
        &self.options
    }

    /// Registers one trigger per contact with a birthday.
    ///
    /// # Side effects
    /// - Calls `notifier.add` once per eligible contact, in slice order.
    /// - Emits one `schedule_register` warning per rejected registration.
    pub fn schedule_contacts(
        &self,
        contacts: &[Contact],
        notifier: &impl NotificationCapability,
        today: NaiveDate,
    ) -> ScheduleReport {
        let started_at = Instant::now();
        let mut report = ScheduleReport::default();

        for contact in contacts {
            let Some(request) = build_request(contact, today, &self.options) else {
                report.skipped_without_birthday += 1;
                continue;
            };

            match notifier.add(&request) {
                Ok(()) => {
                    report.scheduled += 1;
                    report.registered_ids.push(request.id);
                }
                Err(err) => {
                    report.failed += 1;
                    warn!(
                        "event=schedule_register module=schedule status=error error_code=registration_rejected contact_id={} error={}",
                        contact.uuid, err.message
                    );
                }
            }
        }

        info!(
            "event=schedule module=schedule status=ok duration_ms={} scheduled={} skipped={} failed={}",
            started_at.elapsed().as_millis(),
            report.scheduled,
            report.skipped_without_birthday,
            report.failed
        );
        report
    }

    /// Scans the whole store and schedules every contact with a birthday.
    ///
    /// # Errors
    /// - Returns the repository error when the full scan fails; nothing is scheduled.
    pub fn schedule_all(
        &self,
        repo: &impl ContactRepository,
        notifier: &impl NotificationCapability,
        today: NaiveDate,
    ) -> RepoResult<ScheduleReport> {
        let contacts = repo.all().map_err(|err| {
            error!(
                "event=schedule module=schedule status=error error_code={} error={}",
                err.code(),
                err
            );
            err
        })?;
        Ok(self.schedule_contacts(&contacts, notifier, today))
    }
}
