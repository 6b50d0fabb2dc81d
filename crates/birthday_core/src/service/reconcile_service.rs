//! Reconciliation of importer output into the contact store.
//!
//! # Responsibility
//! - Run the address-book import, then the calendar import.
//! - Apply the merge rules per record and persist each change immediately.
//!
//! # Invariants
//! - Address-book records only create contacts; existing names are untouched.
//! - Calendar records overwrite `birthday` of existing contacts, never `message`.
//! - One failing record or source never aborts the rest of the pass.
//!
//! # Preconditions
//! - At most one reconciliation pass runs against a store at a time.

use crate::host::calendar::CalendarCapability;
use crate::host::contacts::ContactsCapability;
use crate::import::address_book::import_address_book;
use crate::import::calendar::import_calendar;
use crate::import::{ImportError, ImportResult, ImportSource, ImportedBirthday};
use crate::model::contact::{Contact, DEFAULT_BIRTHDAY_MESSAGE};
use crate::repo::contact_repo::{ContactRepository, RepoError, UpsertOutcome};
use chrono::NaiveDateTime;
use log::{info, warn};
use std::time::Instant;

/// What happened to one import source during a pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SourceOutcome {
    /// Source was not read (initial state).
    #[default]
    Skipped,
    Imported {
        records: u32,
    },
    AccessDenied,
    FetchFailed,
}

/// Counters for one reconciliation pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReconcileReport {
    pub address_book: SourceOutcome,
    pub calendar: SourceOutcome,
    pub created: u32,
    pub birthdays_updated: u32,
    pub unchanged: u32,
    /// Records whose lookup or save failed; they keep their previous state.
    pub failed: u32,
}

impl ReconcileReport {
    fn record(&mut self, outcome: UpsertOutcome) {
        match outcome {
            UpsertOutcome::Created(_) => self.created += 1,
            UpsertOutcome::BirthdayUpdated(_) => self.birthdays_updated += 1,
            UpsertOutcome::Unchanged(_) => self.unchanged += 1,
        }
    }
}

/// Merges importer output into a contact repository.
pub struct ReconcileService<R: ContactRepository> {
    repo: R,
}

impl<R: ContactRepository> ReconcileService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    pub fn repo(&self) -> &R {
        &self.repo
    }

    /// Runs one full pass: address book first, then calendar.
    ///
    /// # Side effects
    /// - May prompt for contacts and calendar access through the capabilities.
    /// - Persists every created/updated contact immediately.
    pub fn reconcile(
        &self,
        contacts: &impl ContactsCapability,
        calendar: &impl CalendarCapability,
        now: NaiveDateTime,
    ) -> ReconcileReport {
        let started_at = Instant::now();
        let mut report = ReconcileReport::default();

        if let Some(records) = self.read_source(
            ImportSource::AddressBook,
            import_address_book(contacts),
            &mut report.address_book,
        ) {
            self.merge_address_book(&records, &mut report);
        }

        if let Some(records) = self.read_source(
            ImportSource::Calendar,
            import_calendar(calendar, now),
            &mut report.calendar,
        ) {
            self.merge_calendar(&records, &mut report);
        }

        info!(
            "event=reconcile module=service status=ok duration_ms={} address_book={:?} calendar={:?} created={} updated={} unchanged={} failed={}",
            started_at.elapsed().as_millis(),
            report.address_book,
            report.calendar,
            report.created,
            report.birthdays_updated,
            report.unchanged,
            report.failed
        );
        report
    }

    /// Creates contacts for names not yet stored; existing names are left as is.
    pub fn merge_address_book(&self, records: &[ImportedBirthday], report: &mut ReconcileReport) {
        for record in records {
            let result = self.repo.find_by_name(&record.name).and_then(|existing| {
                match existing {
                    Some(contact) => Ok(UpsertOutcome::Unchanged(contact.uuid)),
                    None => {
                        let contact = Contact::new(record.name.as_str(), record.birthday);
                        self.repo
                            .create_contact(&contact)
                            .map(UpsertOutcome::Created)
                    }
                }
            });
            self.apply(ImportSource::AddressBook, result, report);
        }
    }

    /// Applies calendar birthdays; calendar dates win over stored ones.
    pub fn merge_calendar(&self, records: &[ImportedBirthday], report: &mut ReconcileReport) {
        for record in records {
            let result = self.repo.upsert(
                &record.name,
                record.birthday,
                DEFAULT_BIRTHDAY_MESSAGE,
            );
            self.apply(ImportSource::Calendar, result, report);
        }
    }

    fn read_source(
        &self,
        source: ImportSource,
        result: ImportResult<Vec<ImportedBirthday>>,
        outcome: &mut SourceOutcome,
    ) -> Option<Vec<ImportedBirthday>> {
        match result {
            Ok(records) => {
                *outcome = SourceOutcome::Imported {
                    records: u32::try_from(records.len()).unwrap_or(u32::MAX),
                };
                Some(records)
            }
            Err(err) => {
                *outcome = match err {
                    ImportError::AccessDenied(_) => SourceOutcome::AccessDenied,
                    ImportError::Fetch { .. } => SourceOutcome::FetchFailed,
                };
                warn!(
                    "event=reconcile_source module=service status=skipped source={} error_code={} error={}",
                    source.as_str(),
                    err.code(),
                    err
                );
                None
            }
        }
    }

    fn apply(
        &self,
        source: ImportSource,
        result: Result<UpsertOutcome, RepoError>,
        report: &mut ReconcileReport,
    ) {
        match result {
            Ok(outcome) => report.record(outcome),
            Err(err) => {
                report.failed += 1;
                // Error text may quote the contact name; log only the code.
                warn!(
                    "event=reconcile_record module=service status=error source={} error_code={}",
                    source.as_str(),
                    err.code()
                );
            }
        }
    }
}
