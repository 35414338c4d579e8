//! Integration tests for the repository layer.
//!
//! Runs every repository against a real database:
//! - Slot ordering, main-slot filtering and reference checks
//! - Account uniqueness and anonymization
//! - Application status transitions and cancellation handling
//! - Covered pairs and shift history used by gap analysis and stats

use chrono::NaiveDate;
use docent_core::status::{AccountStatus, ApplicationStatus};
use docent_db::models::admin::CreateAdmin;
use docent_db::models::application::CreateApplication;
use docent_db::models::slot::{CreateSlot, UpdateSlot};
use docent_db::models::volunteer::CreateVolunteer;
use docent_db::repositories::{AdminRepo, ApplicationRepo, SlotRepo, VolunteerRepo};
use sqlx::PgPool;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn new_slot(name: &str, start: &str, end: &str, main: bool) -> CreateSlot {
    CreateSlot {
        name: name.to_string(),
        start_time: start.to_string(),
        end_time: end.to_string(),
        is_main: Some(main),
    }
}

fn new_volunteer(email: &str) -> CreateVolunteer {
    CreateVolunteer {
        email: email.to_string(),
        first_name: "Grete".to_string(),
        last_name: "Hansen".to_string(),
        password_hash: "hash".to_string(),
    }
}

fn new_application(
    volunteer_id: i64,
    slot_id: i64,
    date: NaiveDate,
    status: ApplicationStatus,
) -> CreateApplication {
    CreateApplication {
        volunteer_id,
        slot_id,
        date,
        status,
    }
}

// ---------------------------------------------------------------------------
// Slots
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_slots_are_listed_by_start_time(pool: PgPool) {
    SlotRepo::create(&pool, &new_slot("Afternoon", "14:00", "17:00", true))
        .await
        .unwrap();
    SlotRepo::create(&pool, &new_slot("Evening", "17:00", "19:00", false))
        .await
        .unwrap();
    SlotRepo::create(&pool, &new_slot("Morning", "11:00", "14:00", true))
        .await
        .unwrap();

    let names: Vec<_> = SlotRepo::list(&pool)
        .await
        .unwrap()
        .into_iter()
        .map(|s| s.name)
        .collect();
    assert_eq!(names, vec!["Morning", "Afternoon", "Evening"]);

    let main: Vec<_> = SlotRepo::list_main(&pool)
        .await
        .unwrap()
        .into_iter()
        .map(|s| s.name)
        .collect();
    assert_eq!(main, vec!["Morning", "Afternoon"]);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_slot_partial_update(pool: PgPool) {
    let slot = SlotRepo::create(&pool, &new_slot("Morning", "11:00", "14:00", false))
        .await
        .unwrap();
    let update = UpdateSlot {
        name: Some("Early Shift".to_string()),
        ..Default::default()
    };
    let updated = SlotRepo::update(&pool, slot.id, &update)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(updated.name, "Early Shift");
    assert_eq!(updated.start_time, "11:00");
    assert!(!updated.is_main);

    assert!(SlotRepo::update(&pool, slot.id + 1000, &update)
        .await
        .unwrap()
        .is_none());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_slot_rejects_malformed_times(pool: PgPool) {
    let result = SlotRepo::create(&pool, &new_slot("Bad", "9:00", "14:00", false)).await;
    assert!(result.is_err());
    let result = SlotRepo::create(&pool, &new_slot("Backwards", "14:00", "11:00", false)).await;
    assert!(result.is_err());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_referenced_slot_cannot_be_deleted(pool: PgPool) {
    let slot = SlotRepo::create(&pool, &new_slot("Morning", "11:00", "14:00", true))
        .await
        .unwrap();
    let spare = SlotRepo::create(&pool, &new_slot("Spare", "15:00", "16:00", false))
        .await
        .unwrap();
    let volunteer = VolunteerRepo::create(&pool, &new_volunteer("a@example.org"))
        .await
        .unwrap();
    ApplicationRepo::create(
        &pool,
        &new_application(volunteer.id, slot.id, date(2025, 3, 8), ApplicationStatus::Rejected),
    )
    .await
    .unwrap();

    assert!(SlotRepo::is_referenced(&pool, slot.id).await.unwrap());
    assert!(!SlotRepo::is_referenced(&pool, spare.id).await.unwrap());
    assert!(SlotRepo::delete(&pool, slot.id).await.is_err());
    assert!(SlotRepo::delete(&pool, spare.id).await.unwrap());
}

// ---------------------------------------------------------------------------
// Accounts
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_volunteer_registration_and_review(pool: PgPool) {
    let volunteer = VolunteerRepo::create(&pool, &new_volunteer("grete@example.org"))
        .await
        .unwrap();
    assert_eq!(volunteer.account_status, "Pending");

    let pending = VolunteerRepo::list_by_status(&pool, AccountStatus::Pending)
        .await
        .unwrap();
    assert_eq!(pending.len(), 1);

    let approved = VolunteerRepo::update_status(&pool, volunteer.id, AccountStatus::Approved)
        .await
        .unwrap()
        .unwrap();
    assert!(approved.is_approved());
    assert!(VolunteerRepo::list_by_status(&pool, AccountStatus::Pending)
        .await
        .unwrap()
        .is_empty());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_duplicate_volunteer_email_violates_unique_constraint(pool: PgPool) {
    VolunteerRepo::create(&pool, &new_volunteer("dup@example.org"))
        .await
        .unwrap();
    let err = VolunteerRepo::create(&pool, &new_volunteer("Dup@Example.org"))
        .await
        .unwrap_err();
    let db_err = err.as_database_error().expect("database error");
    assert_eq!(db_err.code().as_deref(), Some("23505"));
    assert_eq!(db_err.constraint(), Some("uq_volunteers_email"));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_account_emails_are_stored_lowercase_and_matched_in_any_case(pool: PgPool) {
    let volunteer = VolunteerRepo::create(&pool, &new_volunteer("Grete@Example.org"))
        .await
        .unwrap();
    assert_eq!(volunteer.email, "grete@example.org");

    let found = VolunteerRepo::find_by_email(&pool, "GRETE@example.ORG")
        .await
        .unwrap()
        .expect("volunteer found");
    assert_eq!(found.id, volunteer.id);
    assert!(VolunteerRepo::find_credentials_by_email(&pool, "grete@EXAMPLE.org")
        .await
        .unwrap()
        .is_some());

    let admin = AdminRepo::create(
        &pool,
        &CreateAdmin {
            email: "Ada@Example.org".to_string(),
            first_name: "Ada".to_string(),
            last_name: "Admin".to_string(),
            password_hash: "hash".to_string(),
        },
    )
    .await
    .unwrap();
    assert_eq!(admin.email, "ada@example.org");
    assert!(AdminRepo::find_by_email(&pool, "ADA@example.org")
        .await
        .unwrap()
        .is_some());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_anonymized_accounts_lose_credentials(pool: PgPool) {
    let volunteer = VolunteerRepo::create(&pool, &new_volunteer("gone@example.org"))
        .await
        .unwrap();
    assert!(VolunteerRepo::anonymize(&pool, volunteer.id).await.unwrap());

    let row = VolunteerRepo::find_by_id(&pool, volunteer.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(row.email, format!("deleteduser-{}", volunteer.id));
    assert_eq!(row.first_name, "deleteduser");
    assert!(VolunteerRepo::find_credentials_by_email(&pool, "gone@example.org")
        .await
        .unwrap()
        .is_none());

    let admin = AdminRepo::create(
        &pool,
        &CreateAdmin {
            email: "boss@example.org".to_string(),
            first_name: "Fritz".to_string(),
            last_name: "Overbeck".to_string(),
            password_hash: "hash".to_string(),
        },
    )
    .await
    .unwrap();
    assert_eq!(AdminRepo::list_emails(&pool).await.unwrap(), vec!["boss@example.org"]);
    assert!(AdminRepo::anonymize(&pool, admin.id).await.unwrap());
    assert!(AdminRepo::list_emails(&pool).await.unwrap().is_empty());
}

// ---------------------------------------------------------------------------
// Applications
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_cancellation_round_trip(pool: PgPool) {
    let slot = SlotRepo::create(&pool, &new_slot("Morning", "11:00", "14:00", true))
        .await
        .unwrap();
    let volunteer = VolunteerRepo::create(&pool, &new_volunteer("c@example.org"))
        .await
        .unwrap();
    let app = ApplicationRepo::create(
        &pool,
        &new_application(volunteer.id, slot.id, date(2025, 3, 8), ApplicationStatus::Pending),
    )
    .await
    .unwrap();

    // Only approved applications can be cancelled.
    assert!(ApplicationRepo::request_cancellation(&pool, app.id, "sick")
        .await
        .unwrap()
        .is_none());

    ApplicationRepo::transition(
        &pool,
        app.id,
        ApplicationStatus::Pending,
        ApplicationStatus::Approved,
        None,
    )
    .await
    .unwrap()
    .unwrap();

    let requested = ApplicationRepo::request_cancellation(&pool, app.id, "sick")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(requested.status, "CancellationRequested");
    assert_eq!(requested.cancellation_reason.as_deref(), Some("sick"));
    assert!(requested.cancellation_requested_at.is_some());

    let restored = ApplicationRepo::reject_cancellation(&pool, app.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(restored.status, "Approved");
    assert!(restored.cancellation_reason.is_none());
    assert!(restored.cancellation_requested_at.is_none());

    ApplicationRepo::request_cancellation(&pool, app.id, "moving away")
        .await
        .unwrap()
        .unwrap();
    assert!(ApplicationRepo::approve_cancellation(&pool, app.id).await.unwrap());
    assert!(ApplicationRepo::find_by_id(&pool, app.id).await.unwrap().is_none());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_transition_requires_expected_status(pool: PgPool) {
    let slot = SlotRepo::create(&pool, &new_slot("Morning", "11:00", "14:00", true))
        .await
        .unwrap();
    let volunteer = VolunteerRepo::create(&pool, &new_volunteer("t@example.org"))
        .await
        .unwrap();
    let app = ApplicationRepo::create(
        &pool,
        &new_application(volunteer.id, slot.id, date(2025, 3, 8), ApplicationStatus::Pending),
    )
    .await
    .unwrap();

    let rejected = ApplicationRepo::transition(
        &pool,
        app.id,
        ApplicationStatus::Pending,
        ApplicationStatus::Rejected,
        Some("Already staffed"),
    )
    .await
    .unwrap()
    .unwrap();
    assert_eq!(rejected.note.as_deref(), Some("Already staffed"));

    let again = ApplicationRepo::transition(
        &pool,
        app.id,
        ApplicationStatus::Pending,
        ApplicationStatus::Approved,
        None,
    )
    .await
    .unwrap();
    assert!(again.is_none());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_covered_pairs_and_history(pool: PgPool) {
    let morning = SlotRepo::create(&pool, &new_slot("Morning Shift", "11:00", "14:00", true))
        .await
        .unwrap();
    let afternoon = SlotRepo::create(&pool, &new_slot("Afternoon Shift", "14:00", "17:00", true))
        .await
        .unwrap();
    let volunteer = VolunteerRepo::create(&pool, &new_volunteer("h@example.org"))
        .await
        .unwrap();

    let rows = [
        (morning.id, date(2025, 3, 1), ApplicationStatus::Approved),
        (afternoon.id, date(2025, 3, 8), ApplicationStatus::CancellationRequested),
        (morning.id, date(2025, 3, 9), ApplicationStatus::Pending),
        (afternoon.id, date(2025, 3, 9), ApplicationStatus::Rejected),
    ];
    for (slot_id, d, status) in rows {
        ApplicationRepo::create(&pool, &new_application(volunteer.id, slot_id, d, status))
            .await
            .unwrap();
    }

    let mut covered = ApplicationRepo::covered_pairs(&pool, date(2025, 3, 2))
        .await
        .unwrap();
    covered.sort();
    assert_eq!(
        covered,
        vec![(date(2025, 3, 8), afternoon.id), (date(2025, 3, 9), morning.id)]
    );

    let history = ApplicationRepo::shift_history(&pool, volunteer.id)
        .await
        .unwrap();
    assert_eq!(history.len(), 2);
    assert_eq!(history[0].slot_name, "Morning Shift");
    assert_eq!(history[1].date, date(2025, 3, 8));

    let mine = ApplicationRepo::list_details_for_volunteer(
        &pool,
        volunteer.id,
        &[ApplicationStatus::Pending],
    )
    .await
    .unwrap();
    assert_eq!(mine.len(), 1);
    assert_eq!(mine[0].volunteer_name, "Grete Hansen");
    assert_eq!(mine[0].start_time, "11:00");
}
