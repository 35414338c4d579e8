//! Application entity model and DTOs.

use chrono::NaiveDate;
use docent_core::stats::ShiftRecord;
use docent_core::status::ApplicationStatus;
use docent_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `applications` table.
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Application {
    #[serde(rename = "applicationId")]
    pub id: DbId,
    pub volunteer_id: DbId,
    pub slot_id: DbId,
    pub date: NaiveDate,
    pub status: String,
    pub note: Option<String>,
    pub cancellation_reason: Option<String>,
    pub cancellation_requested_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Application {
    /// Parsed status, or `None` for a value outside the known set.
    pub fn status(&self) -> Option<ApplicationStatus> {
        self.status.parse().ok()
    }
}

/// An application joined with its slot and volunteer, for list endpoints.
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationDetail {
    #[serde(rename = "applicationId")]
    pub id: DbId,
    pub volunteer_id: DbId,
    pub slot_id: DbId,
    pub date: NaiveDate,
    pub status: String,
    pub note: Option<String>,
    pub cancellation_reason: Option<String>,
    pub cancellation_requested_at: Option<Timestamp>,
    pub slot_name: String,
    pub start_time: String,
    pub end_time: String,
    pub volunteer_name: String,
    pub volunteer_email: String,
    pub created_at: Timestamp,
}

/// DTO for inserting an application.
#[derive(Debug, Clone)]
pub struct CreateApplication {
    pub volunteer_id: DbId,
    pub slot_id: DbId,
    pub date: NaiveDate,
    pub status: ApplicationStatus,
}

/// Request body for applying to, or being assigned, a slot.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SlotRequest {
    pub email: String,
    pub application_date: NaiveDate,
    pub slot_id: DbId,
}

/// One past shift with its slot name, feeding stats aggregation.
#[derive(Debug, Clone, FromRow)]
pub struct ShiftHistoryRow {
    pub date: NaiveDate,
    pub slot_id: DbId,
    pub slot_name: String,
}

impl From<ShiftHistoryRow> for ShiftRecord {
    fn from(row: ShiftHistoryRow) -> Self {
        ShiftRecord {
            date: row.date,
            slot_id: row.slot_id,
            slot_name: row.slot_name,
        }
    }
}
