//! Repository for the `admins` table.

use docent_core::types::DbId;
use sqlx::PgPool;

use crate::models::admin::{AccountCredentials, Admin, CreateAdmin};
use crate::repositories::volunteer_repo::DELETED_USER;

const COLUMNS: &str = "id, email, first_name, last_name, created_at, updated_at";

pub struct AdminRepo;

impl AdminRepo {
    pub async fn create(pool: &PgPool, input: &CreateAdmin) -> Result<Admin, sqlx::Error> {
        let query = format!(
            "INSERT INTO admins (email, first_name, last_name, password_hash)
             VALUES (lower($1), $2, $3, $4)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Admin>(&query)
            .bind(&input.email)
            .bind(&input.first_name)
            .bind(&input.last_name)
            .bind(&input.password_hash)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_email(pool: &PgPool, email: &str) -> Result<Option<Admin>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM admins WHERE lower(email) = lower($1)");
        sqlx::query_as::<_, Admin>(&query)
            .bind(email)
            .fetch_optional(pool)
            .await
    }

    pub async fn find_credentials_by_email(
        pool: &PgPool,
        email: &str,
    ) -> Result<Option<AccountCredentials>, sqlx::Error> {
        sqlx::query_as::<_, AccountCredentials>(
            "SELECT id, email, password_hash FROM admins WHERE lower(email) = lower($1)",
        )
        .bind(email)
        .fetch_optional(pool)
        .await
    }

    /// Email addresses of all active admins, for notifications.
    pub async fn list_emails(pool: &PgPool) -> Result<Vec<String>, sqlx::Error> {
        let rows: Vec<(String,)> = sqlx::query_as(
            "SELECT email FROM admins WHERE password_hash IS NOT NULL ORDER BY id",
        )
        .fetch_all(pool)
        .await?;
        Ok(rows.into_iter().map(|(email,)| email).collect())
    }

    /// Overwrite personal fields and drop the password hash.
    pub async fn anonymize(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE admins SET
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
