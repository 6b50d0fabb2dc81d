mod support;

use birthday_core::db::open_db_in_memory;
use birthday_core::{
    Contact, ContactListQuery, ContactRepository, ContactService, ContactServiceError, RepoError,
    SqliteContactRepository, UpsertOutcome,
};
use support::date;
use uuid::Uuid;

#[test]
fn create_and_find_by_name_roundtrip() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteContactRepository::new(&conn);

    let contact = Contact::new("Ana Lima", Some(date(1990, 7, 4)));
    repo.create_contact(&contact).unwrap();

    let loaded = repo.find_by_name("Ana Lima").unwrap().unwrap();
    assert_eq!(loaded, contact);
    assert_eq!(loaded.message, "Happy Birthday!");
}

#[test]
fn find_by_name_is_exact_and_case_sensitive() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteContactRepository::new(&conn);
    repo.create_contact(&Contact::new("Ana Lima", None)).unwrap();

    assert!(repo.find_by_name("ana lima").unwrap().is_none());
    assert!(repo.find_by_name("Ana").unwrap().is_none());
    assert!(repo.find_by_name("Ana Lima ").unwrap().is_none());
}

#[test]
fn duplicate_name_is_rejected() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteContactRepository::new(&conn);
    repo.create_contact(&Contact::new("Sam", None)).unwrap();

    let err = repo.create_contact(&Contact::new("Sam", None)).unwrap_err();
    assert!(matches!(err, RepoError::DuplicateName(name) if name == "Sam"));
}

#[test]
fn unstorable_birthday_year_is_a_db_error_not_a_duplicate() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteContactRepository::new(&conn);

    let err = repo
        .create_contact(&Contact::new("Far Future", Some(date(10000, 5, 5))))
        .unwrap_err();
    assert!(matches!(err, RepoError::Db(_)), "unexpected error: {err:?}");
    assert_eq!(err.code(), "db_error");
    assert!(repo.find_by_name("Far Future").unwrap().is_none());
}

#[test]
fn upsert_creates_then_updates_birthday_only() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteContactRepository::new(&conn);

    let created = repo.upsert("Ana", None, "").unwrap();
    assert!(matches!(created, UpsertOutcome::Created(_)));

    let updated = repo
        .upsert("Ana", Some(date(1990, 7, 4)), "Happy Birthday!")
        .unwrap();
    assert_eq!(updated, UpsertOutcome::BirthdayUpdated(created.contact_id()));

    let stored = repo.find_by_name("Ana").unwrap().unwrap();
    assert_eq!(stored.birthday, Some(date(1990, 7, 4)));
    assert_eq!(stored.message, "", "message must never be overwritten by upsert");
}

#[test]
fn upsert_leaves_contact_unchanged_for_null_or_equal_birthday() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteContactRepository::new(&conn);
    let id = repo
        .upsert("Ana", Some(date(1990, 7, 4)), "Happy Birthday!")
        .unwrap()
        .contact_id();

    assert_eq!(
        repo.upsert("Ana", None, "other").unwrap(),
        UpsertOutcome::Unchanged(id)
    );
    assert_eq!(
        repo.upsert("Ana", Some(date(1990, 7, 4)), "other").unwrap(),
        UpsertOutcome::Unchanged(id)
    );
    assert_eq!(
        repo.find_by_name("Ana").unwrap().unwrap().birthday,
        Some(date(1990, 7, 4))
    );
}

#[test]
fn update_missing_contact_returns_not_found() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteContactRepository::new(&conn);

    let contact = Contact::new("Ghost", None);
    let err = repo.update_contact(&contact).unwrap_err();
    assert!(matches!(err, RepoError::NotFound(id) if id == contact.uuid));
}

#[test]
fn list_orders_by_birthday_desc_then_name_with_missing_birthdays_last() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteContactRepository::new(&conn);
    for contact in [
        Contact::new("Zed", None),
        Contact::new("Bea", Some(date(1980, 1, 1))),
        Contact::new("Ann", None),
        Contact::new("Cal", Some(date(1995, 5, 5))),
        Contact::new("Abe", Some(date(1980, 1, 1))),
    ] {
        repo.create_contact(&contact).unwrap();
    }

    let names = repo
        .all()
        .unwrap()
        .into_iter()
        .map(|contact| contact.name)
        .collect::<Vec<_>>();
    assert_eq!(names, ["Cal", "Abe", "Bea", "Ann", "Zed"]);
}

#[test]
fn list_filters_by_case_sensitive_substring_and_limit() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteContactRepository::new(&conn);
    for name in ["Anna Berg", "Hanna Moe", "anna low", "Bob Ray"] {
        repo.create_contact(&Contact::new(name, None)).unwrap();
    }

    let query = ContactListQuery {
        name_contains: Some("nna".to_string()),
        limit: None,
    };
    assert_eq!(repo.list_contacts(&query).unwrap().len(), 3);

    let query = ContactListQuery {
        name_contains: Some("Anna".to_string()),
        limit: None,
    };
    let found = repo.list_contacts(&query).unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].name, "Anna Berg");

    let limited = ContactListQuery {
        name_contains: None,
        limit: Some(2),
    };
    assert_eq!(repo.list_contacts(&limited).unwrap().len(), 2);
}

#[test]
fn service_update_details_replaces_message_and_birthday() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteContactRepository::new(&conn);
    let contact = Contact::new("Ana", None);
    repo.create_contact(&contact).unwrap();

    let service = ContactService::new(SqliteContactRepository::new(&conn));
    let updated = service
        .update_details(contact.uuid, "Call her!", Some(date(1990, 7, 4)))
        .unwrap();
    assert_eq!(updated.message, "Call her!");
    assert_eq!(updated.name, "Ana");

    let cleared = service.update_details(contact.uuid, "", None).unwrap();
    assert_eq!(cleared.birthday, None);
    assert_eq!(service.get(contact.uuid).unwrap(), cleared);
}

#[test]
fn service_reports_missing_contact() {
    let conn = open_db_in_memory().unwrap();
    let service = ContactService::new(SqliteContactRepository::new(&conn));

    let missing = Uuid::new_v4();
    let err = service.update_details(missing, "x", None).unwrap_err();
    assert!(matches!(err, ContactServiceError::ContactNotFound(id) if id == missing));
}

#[test]
fn service_empty_search_lists_everyone() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteContactRepository::new(&conn);
    repo.create_contact(&Contact::new("Ana", None)).unwrap();
    repo.create_contact(&Contact::new("Bob", None)).unwrap();

    let service = ContactService::new(SqliteContactRepository::new(&conn));
    assert_eq!(service.list(Some("")).unwrap().len(), 2);
    assert_eq!(service.list(None).unwrap().len(), 2);
    assert_eq!(service.list(Some("Bo")).unwrap().len(), 1);
}

#[test]
fn service_search_matches_whitespace_literally() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteContactRepository::new(&conn);
    repo.create_contact(&Contact::new(" Bob", None)).unwrap();
    repo.create_contact(&Contact::new("Ana", None)).unwrap();

    let service = ContactService::new(SqliteContactRepository::new(&conn));
    let names = service
        .list(Some(" "))
        .unwrap()
        .into_iter()
        .map(|contact| contact.name)
        .collect::<Vec<_>>();
    assert_eq!(names, vec![" Bob".to_string()]);
    assert_eq!(service.list(Some(" Bo")).unwrap().len(), 1);
}
