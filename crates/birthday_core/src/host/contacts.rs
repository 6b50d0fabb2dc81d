//! Address-book capability contract.

use crate::host::capability::{Authorizable, CapabilityError};
use crate::model::contact::BirthdayComponents;

/// Field requested from the address book during enumeration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContactKey {
    GivenName,
    FamilyName,
    Birthday,
}

/// One address-book record as enumerated by the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddressBookEntry {
    pub given_name: String,
    pub family_name: String,
    pub birthday: Option<BirthdayComponents>,
}

/// Read access to the platform address book.
pub trait ContactsCapability: Authorizable {
    /// Enumerates all records, populating only the requested `keys`.
    fn enumerate(&self, keys: &[ContactKey]) -> Result<Vec<AddressBookEntry>, CapabilityError>;
}
