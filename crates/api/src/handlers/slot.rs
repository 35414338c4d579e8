//! Handlers for the `/slots` resource.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use docent_core::calendar::validate_slot_times;
use docent_core::types::DbId;
use docent_db::models::slot::{CreateSlot, SlotWithDisplay, UpdateSlot};
use docent_db::repositories::SlotRepo;

use crate::error::{AppError, AppResult};
use crate::middleware::rbac::RequireAdmin;
use crate::response::ApiResponse;
use crate::state::AppState;

/// Slots created by [`seed_slots`]: (name, start, end).
const DEFAULT_SLOTS: [(&str, &str, &str); 2] = [
    ("Morning Shift", "11:00", "14:00"),
    ("Afternoon Shift", "14:00", "17:00"),
];

fn validate_name(name: &str) -> AppResult<()> {
    if name.trim().is_empty() {
        return Err(AppError::BadRequest("Slot name must not be empty".into()));
    }
    Ok(())
}

/// GET /api/slots
///
/// All slots ordered by start time, each with its display text.
pub async fn list_slots(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let slots: Vec<SlotWithDisplay> = SlotRepo::list(&state.pool)
        .await?
        .into_iter()
        .map(SlotWithDisplay::from)
        .collect();

    Ok(Json(ApiResponse::data(slots)))
}

/// POST /api/slots
pub async fn create_slot(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Json(input): Json<CreateSlot>,
) -> AppResult<impl IntoResponse> {
    validate_name(&input.name)?;
    validate_slot_times(&input.start_time, &input.end_time).map_err(AppError::BadRequest)?;

    let slot = SlotRepo::create(&state.pool, &input).await?;

    tracing::info!(
        slot_id = slot.id,
        name = %slot.name,
        admin_id = admin.account_id,
        "Slot created"
    );

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::data(SlotWithDisplay::from(slot)).with_message("Slot created successfully")),
    ))
}

/// PUT /api/slots/{slot_id}
///
/// Partial update. The resulting start/end pair is validated as a whole.
pub async fn update_slot(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(slot_id): Path<DbId>,
    Json(input): Json<UpdateSlot>,
) -> AppResult<impl IntoResponse> {
    let existing = SlotRepo::find_by_id(&state.pool, slot_id)
        .await?
        .ok_or(AppError::not_found("Slot", slot_id))?;

    if let Some(name) = &input.name {
        validate_name(name)?;
    }
    let start = input.start_time.as_deref().unwrap_or(&existing.start_time);
    let end = input.end_time.as_deref().unwrap_or(&existing.end_time);
    validate_slot_times(start, end).map_err(AppError::BadRequest)?;

    let slot = SlotRepo::update(&state.pool, slot_id, &input)
        .await?
        .ok_or(AppError::not_found("Slot", slot_id))?;

    tracing::info!(slot_id, admin_id = admin.account_id, "Slot updated");

    Ok(Json(
        ApiResponse::data(SlotWithDisplay::from(slot)).with_message("Slot updated successfully"),
    ))
}

/// DELETE /api/slots/{slot_id}
///
/// Rejected with 400 while any application references the slot.
pub async fn delete_slot(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(slot_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    if SlotRepo::is_referenced(&state.pool, slot_id).await? {
        return Err(AppError::BadRequest(
            "Cannot delete slot that is referenced by existing applications".into(),
        ));
    }

    if !SlotRepo::delete(&state.pool, slot_id).await? {
        return Err(AppError::not_found("Slot", slot_id));
    }

    tracing::info!(slot_id, admin_id = admin.account_id, "Slot deleted");

    Ok(Json(ApiResponse::message("Slot deleted successfully")))
}

/// POST /api/slots/seed
///
/// Create the default main slots when none exist yet.
pub async fn seed_slots(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let existing = SlotRepo::list(&state.pool).await?;
    if !existing.is_empty() {
        let slots: Vec<SlotWithDisplay> = existing.into_iter().map(SlotWithDisplay::from).collect();
        return Ok((
            StatusCode::OK,
            Json(ApiResponse::data(slots).with_message("Slots already exist")),
        ));
    }

    let mut created = Vec::with_capacity(DEFAULT_SLOTS.len());
    for (name, start_time, end_time) in DEFAULT_SLOTS {
        let input = CreateSlot {
            name: name.to_string(),
            start_time: start_time.to_string(),
            end_time: end_time.to_string(),
            is_main: Some(true),
        };
        created.push(SlotWithDisplay::from(SlotRepo::create(&state.pool, &input).await?));
    }

    tracing::info!(count = created.len(), admin_id = admin.account_id, "Default slots seeded");

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::data(created).with_message("Default slots created")),
    ))
}
