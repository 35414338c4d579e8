//! Admin entity model and DTOs.

use docent_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// Public admin row (no credentials).
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Admin {
    #[serde(rename = "adminId")]
    pub id: DbId,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Admin {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// DTO for creating an admin. The hash is produced by the API layer.
#[derive(Debug, Clone)]
pub struct CreateAdmin {
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub password_hash: String,
}

/// Login material for either account kind.
///
/// Contains the password hash -- NEVER serialize this to API responses.
#[derive(Debug, Clone, FromRow)]
pub struct AccountCredentials {
    pub id: DbId,
    pub email: String,
    pub password_hash: Option<String>,
}
