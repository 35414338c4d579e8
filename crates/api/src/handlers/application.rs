//! Handlers for the `/application` resource, plus the validation shared by
//! every endpoint that creates or describes an application.

use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;
use chrono::NaiveDate;
use docent_core::calendar::{is_qualifying_day, long_date, parse_slot_time, twelve_hour_time};
use docent_core::status::ApplicationStatus;
use docent_core::types::DbId;
use docent_db::models::application::ApplicationDetail;
use docent_db::models::slot::Slot;
use docent_db::models::volunteer::Volunteer;
use docent_db::repositories::{ApplicationRepo, SlotRepo, VolunteerRepo};
use docent_notify::MessageData;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::response::ApiResponse;
use crate::state::AppState;

/// GET /api/application/approved-timeslots
pub async fn approved_timeslots(
    _user: AuthUser,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let applications =
        ApplicationRepo::list_details_by_status(&state.pool, &[ApplicationStatus::Approved])
            .await?;
    Ok(Json(ApiResponse::data(applications)))
}

/// GET /api/application/pending-timeslots
pub async fn pending_timeslots(
    _user: AuthUser,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let applications =
        ApplicationRepo::list_details_by_status(&state.pool, &[ApplicationStatus::Pending])
            .await?;
    Ok(Json(ApiResponse::data(applications)))
}

// ---------------------------------------------------------------------------
// Shared checks
// ---------------------------------------------------------------------------

/// The volunteer behind `email`, who must exist and be approved before they
/// can apply for or be assigned a shift.
pub(crate) async fn schedulable_volunteer(state: &AppState, email: &str) -> AppResult<Volunteer> {
    let volunteer = VolunteerRepo::find_by_email(&state.pool, email.trim())
        .await?
        .ok_or_else(|| AppError::BadRequest("Volunteer does not exist".into()))?;
    if !volunteer.is_approved() {
        return Err(AppError::BadRequest("Volunteer not approved".into()));
    }
    Ok(volunteer)
}

/// Reject dates that are neither weekends nor public holidays.
pub(crate) async fn ensure_qualifying_date(state: &AppState, date: NaiveDate) -> AppResult<()> {
    if !is_qualifying_day(date, state.holidays.as_ref()).await {
        return Err(AppError::BadRequest(
            "Volunteers are only needed on weekends and public holidays".into(),
        ));
    }
    Ok(())
}

pub(crate) async fn existing_slot(state: &AppState, slot_id: DbId) -> AppResult<Slot> {
    SlotRepo::find_by_id(&state.pool, slot_id)
        .await?
        .ok_or(AppError::not_found("Slot", slot_id))
}

pub(crate) async fn existing_detail(
    state: &AppState,
    application_id: DbId,
) -> AppResult<ApplicationDetail> {
    ApplicationRepo::find_detail_by_id(&state.pool, application_id)
        .await?
        .ok_or(AppError::not_found("Application", application_id))
}

/// `"11:00 AM - 2:00 PM"`; unparsable times are shown as stored.
pub(crate) fn shift_time_text(start: &str, end: &str) -> String {
    let format = |value: &str| {
        parse_slot_time(value)
            .map(twelve_hour_time)
            .unwrap_or_else(|_| value.to_string())
    };
    format!("{} - {}", format(start), format(end))
}

/// Message placeholders describing the shift of `detail`.
pub(crate) fn shift_message_data(detail: &ApplicationDetail) -> MessageData {
    MessageData::default()
        .with_name(detail.volunteer_name.clone())
        .with_date(long_date(detail.date))
        .with_time(shift_time_text(&detail.start_time, &detail.end_time))
}
