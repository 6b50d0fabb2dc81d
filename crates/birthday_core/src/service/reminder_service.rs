//! End-to-end refresh: reconcile sources, then schedule reminders.

use crate::host::calendar::CalendarCapability;
use crate::host::contacts::ContactsCapability;
use crate::host::notification::NotificationCapability;
use crate::repo::contact_repo::ContactRepository;
use crate::schedule::scheduler::{NotificationScheduler, ScheduleReport};
use crate::service::reconcile_service::{ReconcileReport, ReconcileService};
use chrono::NaiveDateTime;

/// Result of one refresh.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RefreshReport {
    pub reconcile: ReconcileReport,
    /// `None` when the store could not be scanned for scheduling.
    pub schedule: Option<ScheduleReport>,
}

/// Reconciles imports and schedules reminders over one store.
pub struct ReminderService<R: ContactRepository> {
    reconciler: ReconcileService<R>,
    scheduler: NotificationScheduler,
}

impl<R: ContactRepository> ReminderService<R> {
    pub fn new(repo: R, scheduler: NotificationScheduler) -> Self {
        Self {
            reconciler: ReconcileService::new(repo),
            scheduler,
        }
    }

    /// Runs reconciliation then schedules every stored contact with a birthday.
    ///
    /// Scheduling runs even when both sources were denied, so contacts already
    /// in the store keep their reminders.
    pub fn refresh(
        &self,
        contacts: &impl ContactsCapability,
        calendar: &impl CalendarCapability,
        notifier: &impl NotificationCapability,
        now: NaiveDateTime,
    ) -> RefreshReport {
        let reconcile = self.reconciler.reconcile(contacts, calendar, now);
        let schedule = self
            .scheduler
            .schedule_all(self.reconciler.repo(), notifier, now.date())
            .ok();
        RefreshReport {
            reconcile,
            schedule,
        }
    }
}
