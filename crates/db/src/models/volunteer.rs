//! Volunteer entity model and DTOs.

use docent_core::status::AccountStatus;
use docent_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Public volunteer row (no credentials).
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Volunteer {
    #[serde(rename = "volunteerId")]
    pub id: DbId,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    /// One of `Pending`, `Approved`, `Rejected`.
    pub account_status: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Volunteer {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    /// Parsed account status. Unknown values read as `Pending`.
    pub fn status(&self) -> AccountStatus {
        self.account_status.parse().unwrap_or(AccountStatus::Pending)
    }

    pub fn is_approved(&self) -> bool {
        self.status() == AccountStatus::Approved
    }
}

/// DTO for registering a volunteer. The hash is produced by the API layer.
#[derive(Debug, Clone)]
pub struct CreateVolunteer {
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub password_hash: String,
}

/// Registration payload as sent by clients.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterAccount {
    pub email: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
}
