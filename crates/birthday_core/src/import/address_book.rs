//! Address-book importer.
//!
//! # Invariants
//! - Names are `given + " " + family` with no trimming, so two empty parts
//!   yield a lone space.
//! - Birthday components that do not form a real date import as no birthday.

use crate::host::capability::{ensure_access, HostCapability};
use crate::host::contacts::{AddressBookEntry, ContactKey, ContactsCapability};
use crate::import::{ImportError, ImportResult, ImportSource, ImportedBirthday};
use log::{info, warn};

/// Fields requested from the address book.
pub const ADDRESS_BOOK_KEYS: &[ContactKey] = &[
    ContactKey::GivenName,
    ContactKey::FamilyName,
    ContactKey::Birthday,
];

/// Reads every address-book record as a `(full name, birthday)` candidate.
///
/// # Errors
/// - `AccessDenied` when contacts access is denied, restricted or refused.
/// - `Fetch` when the access prompt or enumeration fails.
pub fn import_address_book(
    contacts: &impl ContactsCapability,
) -> ImportResult<Vec<ImportedBirthday>> {
    let fetch_error = |error| ImportError::Fetch {
        source: ImportSource::AddressBook,
        error,
    };

    if !ensure_access(contacts, HostCapability::Contacts).map_err(fetch_error)? {
        return Err(ImportError::AccessDenied(ImportSource::AddressBook));
    }

    let entries = contacts.enumerate(ADDRESS_BOOK_KEYS).map_err(fetch_error)?;
    let imported = entries.iter().map(to_imported).collect::<Vec<_>>();
    info!(
        "event=address_book_import module=import status=ok records={}",
        imported.len()
    );
    Ok(imported)
}

/// Joins name parts the way the address book displays them.
pub fn full_name(given_name: &str, family_name: &str) -> String {
    format!("{given_name} {family_name}")
}

fn to_imported(entry: &AddressBookEntry) -> ImportedBirthday {
    let birthday = entry.birthday.and_then(|components| {
        let date = components.to_date();
        if date.is_none() {
            warn!(
                "event=address_book_import module=import status=degraded error_code=invalid_birthday month={} day={}",
                components.month, components.day
            );
        }
        date
    });
    ImportedBirthday::new(full_name(&entry.given_name, &entry.family_name), birthday)
}
