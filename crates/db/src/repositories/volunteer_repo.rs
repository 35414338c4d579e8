//! Repository for the `volunteers` table.

use docent_core::status::AccountStatus;
use docent_core::types::DbId;
use sqlx::PgPool;

use crate::models::admin::AccountCredentials;
use crate::models::volunteer::{CreateVolunteer, Volunteer};

const COLUMNS: &str =
    "id, email, first_name, last_name, account_status, created_at, updated_at";

/// Placeholder written over personal fields when an account is deleted.
pub const DELETED_USER: &str = "deleteduser";

pub struct VolunteerRepo;

impl VolunteerRepo {
    /// Insert a new volunteer in `Pending` status. The email is stored
    /// lowercased.
    pub async fn create(pool: &PgPool, input: &CreateVolunteer) -> Result<Volunteer, sqlx::Error> {
        let query = format!(
            "INSERT INTO volunteers (email, first_name, last_name, password_hash)
             VALUES (lower($1), $2, $3, $4)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Volunteer>(&query)
            .bind(&input.email)
            .bind(&input.first_name)
            .bind(&input.last_name)
            .bind(&input.password_hash)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Volunteer>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM volunteers WHERE id = $1");
        sqlx::query_as::<_, Volunteer>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a volunteer by email, ignoring letter case.
    pub async fn find_by_email(
        pool: &PgPool,
        email: &str,
    ) -> Result<Option<Volunteer>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM volunteers WHERE lower(email) = lower($1)");
        sqlx::query_as::<_, Volunteer>(&query)
            .bind(email)
            .fetch_optional(pool)
            .await
    }

    /// Login material for a volunteer.
    pub async fn find_credentials_by_email(
        pool: &PgPool,
        email: &str,
    ) -> Result<Option<AccountCredentials>, sqlx::Error> {
        sqlx::query_as::<_, AccountCredentials>(
            "SELECT id, email, password_hash FROM volunteers WHERE lower(email) = lower($1)",
        )
        .bind(email)
        .fetch_optional(pool)
        .await
    }

    /// List volunteers with the given account status, oldest first.
    pub async fn list_by_status(
        pool: &PgPool,
        status: AccountStatus,
    ) -> Result<Vec<Volunteer>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM volunteers
             WHERE account_status = $1 AND password_hash IS NOT NULL
             ORDER BY created_at, id"
        );
        sqlx::query_as::<_, Volunteer>(&query)
            .bind(status.as_str())
            .fetch_all(pool)
            .await
    }

    /// Set a volunteer's account status. Returns `None` if the volunteer
    /// does not exist.
    pub async fn update_status(
        pool: &PgPool,
        id: DbId,
        status: AccountStatus,
    ) -> Result<Option<Volunteer>, sqlx::Error> {
        let query = format!(
            "UPDATE volunteers SET account_status = $2 WHERE id = $1 RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Volunteer>(&query)
            .bind(id)
            .bind(status.as_str())
            .fetch_optional(pool)
            .await
    }

    /// Overwrite personal fields and drop the password hash.
    ///
    /// The email becomes `deleteduser-{id}` so the unique constraint still
    /// holds. Applications are kept for coverage history.
    pub async fn anonymize(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE volunteers SET
                email = $2 || '-' || id::text,
                first_name = $2,
                last_name = $2,
                password_hash = NULL
             WHERE id = $1",
        )
        .bind(id)
        .bind(DELETED_USER)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}
