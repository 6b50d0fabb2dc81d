//! Contact repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Provide lookup-by-name, upsert and full-scan access to `contacts`.
//! - Keep SQL and date encoding inside the persistence boundary.
//!
//! # Invariants
//! - `upsert` never overwrites `message` of an existing contact.
//! - Read paths reject malformed persisted rows instead of masking them.

use crate::db::DbError;
use crate::model::contact::{Contact, ContactId};
use chrono::NaiveDate;
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, ErrorCode, Row};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

const CONTACT_SELECT_SQL: &str = "SELECT
    uuid,
    name,
    birthday,
    message
FROM contacts";

const BIRTHDAY_DB_FORMAT: &str = "%Y-%m-%d";

pub type RepoResult<T> = Result<T, RepoError>;

/// Persistence error for contact store operations.
#[derive(Debug)]
pub enum RepoError {
    Db(DbError),
    NotFound(ContactId),
    /// Another contact already uses this name.
    DuplicateName(String),
    InvalidData(String),
}

impl RepoError {
    /// Stable machine-readable code; safe to log (never contains contact data).
    pub fn code(&self) -> &'static str {
        match self {
            Self::Db(_) => "db_error",
            Self::NotFound(_) => "contact_not_found",
            Self::DuplicateName(_) => "duplicate_name",
            Self::InvalidData(_) => "invalid_data",
        }
    }
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::NotFound(id) => write!(f, "contact not found: {id}"),
            Self::DuplicateName(name) => write!(f, "contact name already exists: `{name}`"),
            Self::InvalidData(message) => write!(f, "invalid persisted contact data: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::NotFound(_) | Self::DuplicateName(_) | Self::InvalidData(_) => None,
        }
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Effect of one `upsert` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpsertOutcome {
    Created(ContactId),
    BirthdayUpdated(ContactId),
    Unchanged(ContactId),
}

impl UpsertOutcome {
    pub fn contact_id(self) -> ContactId {
        match self {
            Self::Created(id) | Self::BirthdayUpdated(id) | Self::Unchanged(id) => id,
        }
    }
}

/// Query options for listing contacts.
#[derive(Debug, Clone, Default)]
pub struct ContactListQuery {
    /// Case-sensitive substring filter on `name`; blank means no filter.
    pub name_contains: Option<String>,
    pub limit: Option<u32>,
}

/// Repository interface for the contact record store.
pub trait ContactRepository {
    /// Exact, case-sensitive lookup by name.
    fn find_by_name(&self, name: &str) -> RepoResult<Option<Contact>>;
    fn get_contact(&self, id: ContactId) -> RepoResult<Option<Contact>>;
    fn create_contact(&self, contact: &Contact) -> RepoResult<ContactId>;
    /// Replaces `name`, `birthday` and `message` of an existing contact.
    fn update_contact(&self, contact: &Contact) -> RepoResult<()>;
    /// Lists contacts by birthday descending, then name; contacts without birthday last.
    fn list_contacts(&self, query: &ContactListQuery) -> RepoResult<Vec<Contact>>;

    /// Full scan of the store.
    fn all(&self) -> RepoResult<Vec<Contact>> {
        self.list_contacts(&ContactListQuery::default())
    }

    /// Creates the contact when `name` is unknown; otherwise updates only the
    /// birthday, and only when `birthday` is set and differs from the stored one.
    fn upsert(
        &self,
        name: &str,
        birthday: Option<NaiveDate>,
        message: &str,
    ) -> RepoResult<UpsertOutcome> {
        match self.find_by_name(name)? {
            None => {
                let contact = Contact::with_message(name, birthday, message);
                self.create_contact(&contact).map(UpsertOutcome::Created)
            }
            Some(mut existing) => match birthday {
                Some(date) if existing.birthday != Some(date) => {
                    existing.birthday = Some(date);
                    self.update_contact(&existing)?;
                    Ok(UpsertOutcome::BirthdayUpdated(existing.uuid))
                }
                _ => Ok(UpsertOutcome::Unchanged(existing.uuid)),
            },
        }
    }
}

/// SQLite-backed contact repository.
pub struct SqliteContactRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteContactRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl ContactRepository for SqliteContactRepository<'_> {
    fn find_by_name(&self, name: &str) -> RepoResult<Option<Contact>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{CONTACT_SELECT_SQL} WHERE name = ?1;"))?;
        let mut rows = stmt.query([name])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_contact_row(row)?));
        }
        Ok(None)
    }

    fn get_contact(&self, id: ContactId) -> RepoResult<Option<Contact>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{CONTACT_SELECT_SQL} WHERE uuid = ?1;"))?;
        let mut rows = stmt.query([id.to_string()])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_contact_row(row)?));
        }
        Ok(None)
    }

    fn create_contact(&self, contact: &Contact) -> RepoResult<ContactId> {
        self.conn
            .execute(
                "INSERT INTO contacts (uuid, name, birthday, message)
                 VALUES (?1, ?2, ?3, ?4);",
                params![
                    contact.uuid.to_string(),
                    contact.name.as_str(),
                    contact.birthday.map(birthday_to_db),
                    contact.message.as_str(),
                ],
            )
            .map_err(|err| map_name_conflict(err, &contact.name))?;

        Ok(contact.uuid)
    }

    fn update_contact(&self, contact: &Contact) -> RepoResult<()> {
        let changed = self
            .conn
            .execute(
                "UPDATE contacts
                 SET
                    name = ?1,
                    birthday = ?2,
                    message = ?3,
                    updated_at = (strftime('%s', 'now') * 1000)
                 WHERE uuid = ?4;",
                params![
                    contact.name.as_str(),
                    contact.birthday.map(birthday_to_db),
                    contact.message.as_str(),
                    contact.uuid.to_string(),
                ],
            )
            .map_err(|err| map_name_conflict(err, &contact.name))?;

        if changed == 0 {
            return Err(RepoError::NotFound(contact.uuid));
        }

        Ok(())
    }

    fn list_contacts(&self, query: &ContactListQuery) -> RepoResult<Vec<Contact>> {
        let mut sql = format!("{CONTACT_SELECT_SQL} WHERE 1 = 1");
        let mut bind_values: Vec<Value> = Vec::new();

        if let Some(needle) = query
            .name_contains
            .as_deref()
            .filter(|value| !value.is_empty())
        {
            // instr() is case-sensitive, unlike LIKE.
            sql.push_str(" AND instr(name, ?) > 0");
            bind_values.push(Value::Text(needle.to_string()));
        }

        sql.push_str(" ORDER BY birthday IS NULL ASC, birthday DESC, name ASC");

        if let Some(limit) = query.limit {
            sql.push_str(" LIMIT ?");
            bind_values.push(Value::Integer(i64::from(limit)));
        }

        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query(params_from_iter(bind_values))?;
        let mut contacts = Vec::new();

        while let Some(row) = rows.next()? {
            contacts.push(parse_contact_row(row)?);
        }

        Ok(contacts)
    }
}

fn parse_contact_row(row: &Row<'_>) -> RepoResult<Contact> {
    let uuid_text: String = row.get("uuid")?;
    let uuid = Uuid::parse_str(&uuid_text).map_err(|_| {
        RepoError::InvalidData(format!("invalid uuid value `{uuid_text}` in contacts.uuid"))
    })?;

    let birthday = match row.get::<_, Option<String>>("birthday")? {
        Some(value) => Some(parse_birthday(&value).ok_or_else(|| {
            RepoError::InvalidData(format!(
                "invalid birthday `{value}` in contacts.birthday"
            ))
        })?),
        None => None,
    };

    Ok(Contact {
        uuid,
        name: row.get("name")?,
        birthday,
        message: row.get("message")?,
    })
}

fn birthday_to_db(date: NaiveDate) -> String {
    date.format(BIRTHDAY_DB_FORMAT).to_string()
}

fn parse_birthday(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value, BIRTHDAY_DB_FORMAT).ok()
}

fn map_name_conflict(err: rusqlite::Error, name: &str) -> RepoError {
    match &err {
        rusqlite::Error::SqliteFailure(failure, _)
            if failure.code == ErrorCode::ConstraintViolation
                && failure.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE =>
        {
            RepoError::DuplicateName(name.to_string())
        }
        _ => err.into(),
    }
}
