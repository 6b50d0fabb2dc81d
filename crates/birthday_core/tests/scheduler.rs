mod support;

use birthday_core::db::open_db_in_memory;
use birthday_core::{
    Contact, ContactRepository, NotificationPayload, NotificationScheduler, NotificationSound,
    ReminderConfig, ReminderService, ResponseHandler, ScheduleOptions, SourceOutcome,
    SqliteContactRepository, TriggerIdentity,
};
use support::{at, date, entry, event, FakeCalendar, FakeContacts, RecordingNotifier};

fn seeded_repo(conn: &rusqlite::Connection) -> SqliteContactRepository<'_> {
    let repo = SqliteContactRepository::new(conn);
    repo.create_contact(&Contact::new("Ana Lima", Some(date(1990, 1, 5))))
        .unwrap();
    repo.create_contact(&Contact::new("No Birthday", None)).unwrap();
    repo.create_contact(&Contact::with_message(
        "Cy Lo",
        Some(date(1985, 12, 25)),
        "Merry birthday",
    ))
    .unwrap();
    repo
}

#[test]
fn schedules_one_trigger_per_contact_with_birthday() {
    let conn = open_db_in_memory().unwrap();
    let repo = seeded_repo(&conn);
    let notifier = RecordingNotifier::default();

    let report = NotificationScheduler::default()
        .schedule_all(&repo, &notifier, date(2024, 3, 1))
        .unwrap();

    assert_eq!(report.scheduled, 2);
    assert_eq!(report.skipped_without_birthday, 1);
    assert_eq!(report.failed, 0);

    let accepted = notifier.accepted.borrow();
    let cy = accepted
        .iter()
        .find(|request| request.payload.name == "Cy Lo")
        .unwrap();
    assert_eq!(cy.first_fire, at(2024, 12, 25, 8, 0));
    assert_eq!(cy.body, "It's Cy Lo's birthday today!");
    assert_eq!(cy.sound, NotificationSound::Default);
    assert_eq!(cy.payload.message, "Merry birthday");
    assert!(cy.trigger.repeats);

    let ana = accepted
        .iter()
        .find(|request| request.payload.name == "Ana Lima")
        .unwrap();
    assert_eq!(ana.first_fire, at(2025, 1, 5, 8, 0));
    assert_eq!((ana.trigger.month, ana.trigger.day), (1, 5));
}

#[test]
fn rejected_registration_does_not_stop_the_rest() {
    let conn = open_db_in_memory().unwrap();
    let repo = seeded_repo(&conn);
    let notifier = RecordingNotifier::rejecting(&["Cy Lo"]);

    let report = NotificationScheduler::default()
        .schedule_all(&repo, &notifier, date(2024, 3, 1))
        .unwrap();

    assert_eq!(notifier.attempts.get(), 2);
    assert_eq!(report.scheduled, 1);
    assert_eq!(report.failed, 1);
    assert_eq!(notifier.accepted.borrow()[0].payload.name, "Ana Lima");
}

#[test]
fn repeated_runs_duplicate_triggers_with_fresh_identity() {
    let conn = open_db_in_memory().unwrap();
    let repo = seeded_repo(&conn);
    let notifier = RecordingNotifier::default();
    let scheduler = NotificationScheduler::default();

    let first = scheduler.schedule_all(&repo, &notifier, date(2024, 3, 1)).unwrap();
    let second = scheduler.schedule_all(&repo, &notifier, date(2024, 3, 1)).unwrap();

    assert_eq!(notifier.accepted.borrow().len(), 4);
    assert!(first
        .registered_ids
        .iter()
        .all(|id| !second.registered_ids.contains(id)));
}

#[test]
fn per_contact_identity_reuses_ids_across_runs() {
    let conn = open_db_in_memory().unwrap();
    let repo = seeded_repo(&conn);
    let notifier = RecordingNotifier::default();
    let scheduler = NotificationScheduler::new(ScheduleOptions {
        trigger_identity: TriggerIdentity::PerContact,
        ..ScheduleOptions::default()
    });

    let first = scheduler.schedule_all(&repo, &notifier, date(2024, 3, 1)).unwrap();
    let second = scheduler.schedule_all(&repo, &notifier, date(2024, 3, 1)).unwrap();

    assert_eq!(first.registered_ids, second.registered_ids);
    let ana = repo.find_by_name("Ana Lima").unwrap().unwrap();
    assert!(first
        .registered_ids
        .contains(&format!("birthday-{}", ana.uuid)));
}

#[test]
fn leap_day_trigger_uses_resolved_date() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteContactRepository::new(&conn);
    repo.create_contact(&Contact::new("Leap", Some(date(1996, 2, 29))))
        .unwrap();
    let notifier = RecordingNotifier::default();
    let options = ReminderConfig::from_json(r#"{"leap_day_policy": "shift_to_mar1", "fire_hour": 7, "fire_minute": 30}"#)
        .unwrap()
        .schedule_options()
        .unwrap();

    NotificationScheduler::new(options)
        .schedule_all(&repo, &notifier, date(2025, 1, 10))
        .unwrap();

    let accepted = notifier.accepted.borrow();
    assert_eq!(accepted[0].first_fire, at(2025, 3, 1, 7, 30));
    assert_eq!(
        (accepted[0].trigger.month, accepted[0].trigger.day, accepted[0].trigger.hour),
        (3, 1, 7)
    );
}

#[test]
fn refresh_reconciles_then_schedules_and_payload_reaches_compose_flow() {
    let conn = open_db_in_memory().unwrap();
    let service = ReminderService::new(
        SqliteContactRepository::new(&conn),
        NotificationScheduler::default(),
    );
    let contacts = FakeContacts::authorized(vec![
        entry("Ana", "Lima", None),
        entry("John", "Smith", None),
    ]);
    let calendar = FakeCalendar::authorized(vec![event(
        "Birthday: Ana Lima",
        at(2024, 8, 14, 0, 0),
    )]);
    let notifier = RecordingNotifier::default();

    let report = service.refresh(&contacts, &calendar, &notifier, at(2024, 3, 1, 9, 0));

    assert_eq!(report.reconcile.address_book, SourceOutcome::Imported { records: 2 });
    assert_eq!(report.reconcile.created, 3);
    let schedule = report.schedule.expect("store scan should succeed");
    assert_eq!(schedule.scheduled, 1);
    assert_eq!(schedule.skipped_without_birthday, 2);

    let request = notifier.accepted.borrow()[0].clone();
    assert_eq!(request.payload.name, " Ana Lima");
    assert_eq!(request.first_fire, at(2024, 8, 14, 8, 0));

    let (handler, receiver) = ResponseHandler::channel();
    handler
        .handle_user_info(&request.payload.to_user_info().unwrap())
        .unwrap();
    let compose = receiver.try_recv().unwrap();
    assert_eq!(compose.name, " Ana Lima");
    assert_eq!(compose.message, "Happy Birthday!");
}

#[test]
fn refresh_still_schedules_stored_contacts_when_sources_are_denied() {
    let conn = open_db_in_memory().unwrap();
    let repo = seeded_repo(&conn);
    drop(repo);
    let service = ReminderService::new(
        SqliteContactRepository::new(&conn),
        NotificationScheduler::default(),
    );
    let notifier = RecordingNotifier::default();

    let report = service.refresh(
        &FakeContacts::denied(),
        &FakeCalendar::denied(),
        &notifier,
        at(2024, 3, 1, 9, 0),
    );

    assert_eq!(report.reconcile.address_book, SourceOutcome::AccessDenied);
    assert_eq!(report.schedule.map(|schedule| schedule.scheduled), Some(2));
}

#[test]
fn payload_user_info_roundtrips_through_json() {
    let payload = NotificationPayload {
        name: "Zoë \"Z\" Ng".to_string(),
        message: "Line one\nline two".to_string(),
    };
    let decoded = NotificationPayload::from_user_info(&payload.to_user_info().unwrap()).unwrap();
    assert_eq!(decoded, payload);
}
