//! Source importers producing `(name, birthday)` candidates.
//!
//! # Responsibility
//! - Read one host data source each and normalize it into `ImportedBirthday`.
//! - Report access refusal and fetch failures per source.
//!
//! # Invariants
//! - Importers are stateless and never touch the contact store.
//! - A failure in one source never affects the other.

use crate::host::capability::CapabilityError;
use chrono::NaiveDate;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod address_book;
pub mod calendar;

pub type ImportResult<T> = Result<T, ImportError>;

/// Origin of an imported record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImportSource {
    AddressBook,
    Calendar,
}

impl ImportSource {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::AddressBook => "address_book",
            Self::Calendar => "calendar",
        }
    }
}

/// Candidate record produced by an importer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportedBirthday {
    pub name: String,
    pub birthday: Option<NaiveDate>,
}

impl ImportedBirthday {
    pub fn new(name: impl Into<String>, birthday: Option<NaiveDate>) -> Self {
        Self {
            name: name.into(),
            birthday,
        }
    }
}

/// Source-level import failure. Neither variant is fatal to reconciliation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImportError {
    /// The user (or a device policy) refused access to the source.
    AccessDenied(ImportSource),
    /// Authorization request or enumeration failed.
    Fetch {
        source: ImportSource,
        error: CapabilityError,
    },
}

impl ImportError {
    pub fn code(&self) -> &'static str {
        match self {
            Self::AccessDenied(_) => "access_denied",
            Self::Fetch { .. } => "fetch_failed",
        }
    }
}

impl Display for ImportError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::AccessDenied(source) => write!(f, "access denied for {}", source.as_str()),
            Self::Fetch { source, error } => {
                write!(f, "failed to read {}: {error}", source.as_str())
            }
        }
    }
}

impl Error for ImportError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::AccessDenied(_) => None,
            Self::Fetch { error, .. } => Some(error),
        }
    }
}
