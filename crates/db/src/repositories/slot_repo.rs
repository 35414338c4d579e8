//! Repository for the `slots` table.

use docent_core::types::DbId;
use sqlx::PgPool;

use crate::models::slot::{CreateSlot, Slot, UpdateSlot};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, name, start_time, end_time, is_main, created_at, updated_at";

/// Provides CRUD operations for slots.
pub struct SlotRepo;

impl SlotRepo {
    /// Insert a new slot, returning the created row.
    pub async fn create(pool: &PgPool, input: &CreateSlot) -> Result<Slot, sqlx::Error> {
        let query = format!(
            "INSERT INTO slots (name, start_time, end_time, is_main)
             VALUES ($1, $2, $3, COALESCE($4, false))
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Slot>(&query)
            .bind(&input.name)
            .bind(&input.start_time)
            .bind(&input.end_time)
            .bind(input.is_main)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Slot>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM slots WHERE id = $1");
        sqlx::query_as::<_, Slot>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List all slots ordered by start time.
    pub async fn list(pool: &PgPool) -> Result<Vec<Slot>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM slots ORDER BY start_time, id");
        sqlx::query_as::<_, Slot>(&query).fetch_all(pool).await
    }

    /// List main slots (the ones gap analysis considers) ordered by start time.
    pub async fn list_main(pool: &PgPool) -> Result<Vec<Slot>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM slots WHERE is_main ORDER BY start_time, id");
        sqlx::query_as::<_, Slot>(&query).fetch_all(pool).await
    }

    /// Update a slot. Only non-`None` fields in `input` are applied.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateSlot,
    ) -> Result<Option<Slot>, sqlx::Error> {
        let query = format!(
            "UPDATE slots SET
                name = COALESCE($2, name),
                start_time = COALESCE($3, start_time),
                end_time = COALESCE($4, end_time),
                is_main = COALESCE($5, is_main)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Slot>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(&input.start_time)
            .bind(&input.end_time)
            .bind(input.is_main)
            .fetch_optional(pool)
            .await
    }

    /// Delete a slot. Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM slots WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Whether any application, in any status, references the slot.
    pub async fn is_referenced(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let (referenced,): (bool,) =
            sqlx::query_as("SELECT EXISTS (SELECT 1 FROM applications WHERE slot_id = $1)")
                .bind(id)
                .fetch_one(pool)
                .await?;
        Ok(referenced)
    }
}
