//! Handlers for the `/admin` resource: application and account review.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use docent_core::calendar::long_date;
use docent_core::status::{state_machine, AccountStatus, ApplicationStatus};
use docent_core::types::DbId;
use docent_db::models::application::{CreateApplication, SlotRequest};
use docent_db::repositories::{ApplicationRepo, VolunteerRepo};
use docent_notify::{MessageData, MessageKey};
use serde::Deserialize;

use crate::error::{AppError, AppResult};
use crate::handlers::application::{
    ensure_qualifying_date, existing_detail, existing_slot, schedulable_volunteer,
    shift_message_data,
};
use crate::handlers::recommendation::forget_cached_recommendations;
use crate::middleware::rbac::RequireAdmin;
use crate::notifications::notify_one;
use crate::response::ApiResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request types
// ---------------------------------------------------------------------------

/// Request body for `POST /admin/verify-time-slot-application`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifyApplicationRequest {
    pub application_id: DbId,
    pub status: ApplicationStatus,
    pub note: Option<String>,
}

/// Request body for `POST /admin/verify-new-volunteer-application`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifyVolunteerRequest {
    pub volunteer_id: DbId,
    pub status: AccountStatus,
}

/// Body naming a single application.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationIdRequest {
    pub application_id: DbId,
}

/// Request body for `PUT /admin/update-application`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateApplicationRequest {
    pub application_id: DbId,
    pub slot_id: DbId,
}

// ---------------------------------------------------------------------------
// Application review
// ---------------------------------------------------------------------------

/// POST /api/admin/verify-time-slot-application
///
/// `Pending` -> `Approved` or `Rejected`. A note is passed to the volunteer
/// as the rejection reason.
pub async fn verify_time_slot_application(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Json(input): Json<VerifyApplicationRequest>,
) -> AppResult<impl IntoResponse> {
    state_machine::validate_transition(ApplicationStatus::Pending, input.status)
        .map_err(AppError::BadRequest)?;

    let note = input
        .note
        .as_deref()
        .map(str::trim)
        .filter(|n| !n.is_empty());

    let detail = existing_detail(&state, input.application_id).await?;
    let application = ApplicationRepo::transition(
        &state.pool,
        input.application_id,
        ApplicationStatus::Pending,
        input.status,
        note,
    )
    .await?
    .ok_or_else(|| AppError::conflict("Application has already been reviewed"))?;
    forget_cached_recommendations(&state).await;

    tracing::info!(
        application_id = application.id,
        status = %application.status,
        admin_id = admin.account_id,
        "Shift application reviewed"
    );

    let data = MessageData::default().with_name(detail.volunteer_name.clone());
    let (key, data) = match input.status {
        ApplicationStatus::Approved => (MessageKey::TimeSlotApproved, data),
        _ => (
            MessageKey::TimeSlotRejected,
            data.with_reason(note.unwrap_or_default()),
        ),
    };
    notify_one(&state, &detail.volunteer_email, key, data);

    Ok(Json(
        ApiResponse::data(application).with_message("Application status updated"),
    ))
}

/// POST /api/admin/verify-new-volunteer-application
pub async fn verify_new_volunteer_application(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Json(input): Json<VerifyVolunteerRequest>,
) -> AppResult<impl IntoResponse> {
    if input.status == AccountStatus::Pending {
        return Err(AppError::BadRequest(
            "Status must be Approved or Rejected".into(),
        ));
    }

    let volunteer = VolunteerRepo::update_status(&state.pool, input.volunteer_id, input.status)
        .await?
        .ok_or(AppError::not_found("Volunteer", input.volunteer_id))?;

    tracing::info!(
        volunteer_id = volunteer.id,
        status = %input.status,
        admin_id = admin.account_id,
        "Volunteer account reviewed"
    );

    let key = match input.status {
        AccountStatus::Approved => MessageKey::AccountApproved,
        _ => MessageKey::AccountRejected,
    };
    notify_one(
        &state,
        &volunteer.email,
        key,
        MessageData::default().with_name(volunteer.full_name()),
    );

    Ok(Json(
        ApiResponse::data(volunteer).with_message("Volunteer status updated"),
    ))
}

/// DELETE /api/admin/delete-application
pub async fn delete_application(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Json(input): Json<ApplicationIdRequest>,
) -> AppResult<impl IntoResponse> {
    if !ApplicationRepo::delete(&state.pool, input.application_id).await? {
        return Err(AppError::not_found("Application", input.application_id));
    }
    forget_cached_recommendations(&state).await;

    tracing::info!(
        application_id = input.application_id,
        admin_id = admin.account_id,
        "Application deleted"
    );

    Ok(Json(ApiResponse::message("Application deleted successfully")))
}

/// PUT /api/admin/update-application
///
/// Move an application to another slot on the same date.
pub async fn update_application(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Json(input): Json<UpdateApplicationRequest>,
) -> AppResult<impl IntoResponse> {
    existing_slot(&state, input.slot_id).await?;

    let application = ApplicationRepo::update_slot(&state.pool, input.application_id, input.slot_id)
        .await?
        .ok_or(AppError::not_found("Application", input.application_id))?;
    forget_cached_recommendations(&state).await;

    tracing::info!(
        application_id = application.id,
        slot_id = application.slot_id,
        admin_id = admin.account_id,
        "Application moved to another slot"
    );

    Ok(Json(
        ApiResponse::data(application).with_message("Application updated successfully"),
    ))
}

// ---------------------------------------------------------------------------
// Listings
// ---------------------------------------------------------------------------

/// GET /api/admin/pending-volunteers
pub async fn pending_volunteers(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let volunteers = VolunteerRepo::list_by_status(&state.pool, AccountStatus::Pending).await?;
    Ok(Json(ApiResponse::data(volunteers)))
}

/// GET /api/admin/approved-volunteers
pub async fn approved_volunteers(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let volunteers = VolunteerRepo::list_by_status(&state.pool, AccountStatus::Approved).await?;
    Ok(Json(ApiResponse::data(volunteers)))
}

/// GET /api/admin/cancellation-requests
pub async fn cancellation_requests(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let applications = ApplicationRepo::list_details_by_status(
        &state.pool,
        &[ApplicationStatus::CancellationRequested],
    )
    .await?;
    Ok(Json(ApiResponse::data(applications)))
}

// ---------------------------------------------------------------------------
// Cancellations
// ---------------------------------------------------------------------------

/// POST /api/admin/approve-cancellation
///
/// Deletes the application, freeing the slot.
pub async fn approve_cancellation(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Json(input): Json<ApplicationIdRequest>,
) -> AppResult<impl IntoResponse> {
    let detail = existing_detail(&state, input.application_id).await?;

    if !ApplicationRepo::approve_cancellation(&state.pool, input.application_id).await? {
        return Err(AppError::conflict("No pending cancellation request"));
    }
    forget_cached_recommendations(&state).await;

    tracing::info!(
        application_id = input.application_id,
        volunteer_id = detail.volunteer_id,
        admin_id = admin.account_id,
        "Cancellation approved"
    );

    notify_one(
        &state,
        &detail.volunteer_email,
        MessageKey::CancellationApproved,
        shift_message_data(&detail),
    );

    Ok(Json(ApiResponse::message("Cancellation approved")))
}

/// POST /api/admin/reject-cancellation
///
/// The shift stays scheduled; reason and request time are cleared.
pub async fn reject_cancellation(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Json(input): Json<ApplicationIdRequest>,
) -> AppResult<impl IntoResponse> {
    let detail = existing_detail(&state, input.application_id).await?;

    let application = ApplicationRepo::reject_cancellation(&state.pool, input.application_id)
        .await?
        .ok_or_else(|| AppError::conflict("No pending cancellation request"))?;

    tracing::info!(
        application_id = application.id,
        admin_id = admin.account_id,
        "Cancellation rejected"
    );

    notify_one(
        &state,
        &detail.volunteer_email,
        MessageKey::CancellationRejected,
        shift_message_data(&detail),
    );

    Ok(Json(
        ApiResponse::data(application).with_message("Cancellation rejected"),
    ))
}

// ---------------------------------------------------------------------------
// Assignment
// ---------------------------------------------------------------------------

/// POST /api/admin/assign-time-slot
///
/// Schedule a volunteer directly; the application starts `Approved`.
pub async fn assign_time_slot(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Json(input): Json<SlotRequest>,
) -> AppResult<impl IntoResponse> {
    let volunteer = schedulable_volunteer(&state, &input.email).await?;
    ensure_qualifying_date(&state, input.application_date).await?;
    existing_slot(&state, input.slot_id).await?;

    let application = ApplicationRepo::create(
        &state.pool,
        &CreateApplication {
            volunteer_id: volunteer.id,
            slot_id: input.slot_id,
            date: input.application_date,
            status: ApplicationStatus::Approved,
        },
    )
    .await?;
    forget_cached_recommendations(&state).await;

    tracing::info!(
        application_id = application.id,
        volunteer_id = volunteer.id,
        date = %application.date,
        admin_id = admin.account_id,
        "Shift assigned"
    );

    notify_one(
        &state,
        &volunteer.email,
        MessageKey::NewAssignment,
        MessageData::default()
            .with_name(volunteer.full_name())
            .with_date(long_date(application.date)),
    );

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::data(application).with_message("Time slot assigned successfully")),
    ))
}

