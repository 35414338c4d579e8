//! Repository for the `applications` table.

use chrono::NaiveDate;
use docent_core::status::{ApplicationStatus, COVERING_STATUSES, HISTORY_STATUSES};
use docent_core::types::DbId;
use sqlx::PgPool;

use crate::models::application::{
    Application, ApplicationDetail, CreateApplication, ShiftHistoryRow,
};

const COLUMNS: &str = "id, volunteer_id, slot_id, date, status, note, cancellation_reason, \
                       cancellation_requested_at, created_at, updated_at";

/// Select list and joins producing [`ApplicationDetail`] rows.
const DETAIL_SELECT: &str = "SELECT a.id, a.volunteer_id, a.slot_id, a.date, a.status, a.note,
                a.cancellation_reason, a.cancellation_requested_at,
                s.name AS slot_name, s.start_time, s.end_time,
                v.first_name || ' ' || v.last_name AS volunteer_name,
                v.email AS volunteer_email,
                a.created_at
         FROM applications a
         JOIN slots s ON s.id = a.slot_id
         JOIN volunteers v ON v.id = a.volunteer_id";

fn status_names(statuses: &[ApplicationStatus]) -> Vec<String> {
    statuses.iter().map(|s| s.as_str().to_string()).collect()
}

pub struct ApplicationRepo;

impl ApplicationRepo {
    pub async fn create(
        pool: &PgPool,
        input: &CreateApplication,
    ) -> Result<Application, sqlx::Error> {
        let query = format!(
            "INSERT INTO applications (volunteer_id, slot_id, date, status)
             VALUES ($1, $2, $3, $4)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Application>(&query)
            .bind(input.volunteer_id)
            .bind(input.slot_id)
            .bind(input.date)
            .bind(input.status.as_str())
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Application>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM applications WHERE id = $1");
        sqlx::query_as::<_, Application>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn find_detail_by_id(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<ApplicationDetail>, sqlx::Error> {
        let query = format!("{DETAIL_SELECT} WHERE a.id = $1");
        sqlx::query_as::<_, ApplicationDetail>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// All applications in any of `statuses`, ordered by date then slot start.
    pub async fn list_details_by_status(
        pool: &PgPool,
        statuses: &[ApplicationStatus],
    ) -> Result<Vec<ApplicationDetail>, sqlx::Error> {
        let query = format!(
            "{DETAIL_SELECT}
             WHERE a.status = ANY($1)
             ORDER BY a.date, s.start_time, a.id"
        );
        sqlx::query_as::<_, ApplicationDetail>(&query)
            .bind(status_names(statuses))
            .fetch_all(pool)
            .await
    }

    /// A volunteer's applications in any of `statuses`.
    pub async fn list_details_for_volunteer(
        pool: &PgPool,
        volunteer_id: DbId,
        statuses: &[ApplicationStatus],
    ) -> Result<Vec<ApplicationDetail>, sqlx::Error> {
        let query = format!(
            "{DETAIL_SELECT}
             WHERE a.volunteer_id = $1 AND a.status = ANY($2)
             ORDER BY a.date, s.start_time, a.id"
        );
        sqlx::query_as::<_, ApplicationDetail>(&query)
            .bind(volunteer_id)
            .bind(status_names(statuses))
            .fetch_all(pool)
            .await
    }

    /// Move an application from `from` to `to`, optionally replacing the note.
    ///
    /// Returns `None` when the application does not exist or is no longer in
    /// `from`.
    pub async fn transition(
        pool: &PgPool,
        id: DbId,
        from: ApplicationStatus,
        to: ApplicationStatus,
        note: Option<&str>,
    ) -> Result<Option<Application>, sqlx::Error> {
        let query = format!(
            "UPDATE applications SET status = $3, note = COALESCE($4, note)
             WHERE id = $1 AND status = $2
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Application>(&query)
            .bind(id)
            .bind(from.as_str())
            .bind(to.as_str())
            .bind(note)
            .fetch_optional(pool)
            .await
    }

    /// `Approved` -> `CancellationRequested`, recording reason and time.
    pub async fn request_cancellation(
        pool: &PgPool,
        id: DbId,
        reason: &str,
    ) -> Result<Option<Application>, sqlx::Error> {
        let query = format!(
            "UPDATE applications SET
                status = $3,
                cancellation_reason = $4,
                cancellation_requested_at = NOW()
             WHERE id = $1 AND status = $2
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Application>(&query)
            .bind(id)
            .bind(ApplicationStatus::Approved.as_str())
            .bind(ApplicationStatus::CancellationRequested.as_str())
            .bind(reason)
            .fetch_optional(pool)
            .await
    }

    /// `CancellationRequested` -> `Approved`, clearing reason and time.
    pub async fn reject_cancellation(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<Application>, sqlx::Error> {
        let query = format!(
            "UPDATE applications SET
                status = $3,
                cancellation_reason = NULL,
                cancellation_requested_at = NULL
             WHERE id = $1 AND status = $2
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Application>(&query)
            .bind(id)
            .bind(ApplicationStatus::CancellationRequested.as_str())
            .bind(ApplicationStatus::Approved.as_str())
            .fetch_optional(pool)
            .await
    }

    /// Delete an application with a pending cancellation request.
    pub async fn approve_cancellation(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM applications WHERE id = $1 AND status = $2")
            .bind(id)
            .bind(ApplicationStatus::CancellationRequested.as_str())
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Move an application to another slot on the same date.
    pub async fn update_slot(
        pool: &PgPool,
        id: DbId,
        slot_id: DbId,
    ) -> Result<Option<Application>, sqlx::Error> {
        let query = format!(
            "UPDATE applications SET slot_id = $2 WHERE id = $1 RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Application>(&query)
            .bind(id)
            .bind(slot_id)
            .fetch_optional(pool)
            .await
    }

    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM applications WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// (date, slot) pairs on or after `from` held by an active application.
    pub async fn covered_pairs(
        pool: &PgPool,
        from: NaiveDate,
    ) -> Result<Vec<(NaiveDate, DbId)>, sqlx::Error> {
        sqlx::query_as::<_, (NaiveDate, DbId)>(
            "SELECT DISTINCT date, slot_id FROM applications
             WHERE status = ANY($1) AND date >= $2",
        )
        .bind(status_names(&COVERING_STATUSES))
        .bind(from)
        .fetch_all(pool)
        .await
    }

    /// A volunteer's counted shifts (approved, or approved with a pending
    /// cancellation), oldest first.
    pub async fn shift_history(
        pool: &PgPool,
        volunteer_id: DbId,
    ) -> Result<Vec<ShiftHistoryRow>, sqlx::Error> {
        sqlx::query_as::<_, ShiftHistoryRow>(
            "SELECT a.date, a.slot_id, s.name AS slot_name
             FROM applications a
             JOIN slots s ON s.id = a.slot_id
             WHERE a.volunteer_id = $1 AND a.status = ANY($2)
             ORDER BY a.date, s.start_time, a.id",
        )
        .bind(volunteer_id)
        .bind(status_names(&HISTORY_STATUSES))
        .fetch_all(pool)
        .await
    }
}
