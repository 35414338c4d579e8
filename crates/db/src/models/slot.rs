//! Slot entity model and DTOs.

use docent_core::calendar::slot_display_text;
use docent_core::coverage::GapSlot;
use docent_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `slots` table.
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Slot {
    #[serde(rename = "slotId")]
    pub id: DbId,
    pub name: String,
    /// `HH:mm`, 24h.
    pub start_time: String,
    /// `HH:mm`, 24h.
    pub end_time: String,
    /// Main slots take part in coverage gap analysis.
    #[serde(rename = "main")]
    pub is_main: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Slot {
    /// Compact hours, e.g. `"11 - 14"`.
    pub fn display_text(&self) -> String {
        slot_display_text(&self.start_time, &self.end_time)
    }
}

impl From<&Slot> for GapSlot {
    fn from(slot: &Slot) -> Self {
        GapSlot {
            slot_id: slot.id,
            name: slot.name.clone(),
            start_time: slot.start_time.clone(),
            end_time: slot.end_time.clone(),
        }
    }
}

/// A slot plus its display text, as returned by the API.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SlotWithDisplay {
    #[serde(flatten)]
    pub slot: Slot,
    pub display_text: String,
}

impl From<Slot> for SlotWithDisplay {
    fn from(slot: Slot) -> Self {
        let display_text = slot.display_text();
        Self { slot, display_text }
    }
}

/// DTO for creating a slot.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateSlot {
    pub name: String,
    pub start_time: String,
    pub end_time: String,
    #[serde(default, rename = "main")]
    pub is_main: Option<bool>,
}

/// DTO for patching a slot. Only present fields are applied.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateSlot {
    pub name: Option<String>,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
    #[serde(default, rename = "main")]
    pub is_main: Option<bool>,
}
