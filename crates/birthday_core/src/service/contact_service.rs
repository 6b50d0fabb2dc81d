//! Contact use-case service for the list and edit screens.
//!
//! # Invariants
//! - `update_details` replaces message and birthday together; name is untouched.
//! - Blank search text lists every contact.

use crate::model::contact::{Contact, ContactId};
use crate::repo::contact_repo::{ContactListQuery, ContactRepository, RepoError};
use chrono::NaiveDate;
use std::error::Error;
use std::fmt::{Display, Formatter};

#[derive(Debug)]
pub enum ContactServiceError {
    ContactNotFound(ContactId),
    Repo(RepoError),
}

impl Display for ContactServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ContactNotFound(id) => write!(f, "contact not found: {id}"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ContactServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Repo(err) => Some(err),
            Self::ContactNotFound(_) => None,
        }
    }
}

impl From<RepoError> for ContactServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::NotFound(id) => Self::ContactNotFound(id),
            other => Self::Repo(other),
        }
    }
}

/// Contact list/edit facade over a repository.
pub struct ContactService<R: ContactRepository> {
    repo: R,
}

impl<R: ContactRepository> ContactService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Lists contacts whose name contains `search` (case-sensitive, untrimmed).
    ///
    /// Whitespace is matched literally; calendar-imported names start with a space.
    pub fn list(&self, search: Option<&str>) -> Result<Vec<Contact>, ContactServiceError> {
        let query = ContactListQuery {
            name_contains: search
                .filter(|value| !value.is_empty())
                .map(str::to_string),
            limit: None,
        };
        Ok(self.repo.list_contacts(&query)?)
    }

    pub fn get(&self, id: ContactId) -> Result<Contact, ContactServiceError> {
        self.repo
            .get_contact(id)?
            .ok_or(ContactServiceError::ContactNotFound(id))
    }

    /// Saves the edit sheet: new message and birthday (which may be cleared).
    pub fn update_details(
        &self,
        id: ContactId,
        message: impl Into<String>,
        birthday: Option<NaiveDate>,
    ) -> Result<Contact, ContactServiceError> {
        let mut contact = self.get(id)?;
        contact.message = message.into();
        contact.birthday = birthday;
        self.repo.update_contact(&contact)?;
        Ok(contact)
    }
}
