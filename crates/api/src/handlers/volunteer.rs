//! Handlers for the `/volunteer` resource.
//!
//! Every endpoint is scoped to one volunteer; callers may only act on their
//! own email or application unless they are an admin.

use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum::Json;
use docent_core::error::CoreError;
use docent_core::status::ApplicationStatus;
use docent_core::types::DbId;
use docent_db::models::application::{CreateApplication, SlotRequest};
use docent_db::models::volunteer::Volunteer;
use docent_db::repositories::{ApplicationRepo, VolunteerRepo};
use docent_notify::{MessageData, MessageKey};
use serde::Deserialize;

use crate::error::{AppError, AppResult};
use crate::handlers::application::{
    ensure_qualifying_date, existing_detail, existing_slot, schedulable_volunteer,
    shift_message_data,
};
use crate::handlers::recommendation::forget_cached_recommendations;
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::{ensure_owner_or_admin, ensure_self_or_admin};
use crate::notifications::notify_admins;
use crate::response::ApiResponse;
use crate::state::AppState;

/// Request body for `POST /volunteer/request-cancellation`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CancellationRequestBody {
    pub application_id: DbId,
    #[serde(default)]
    pub reason: String,
}

/// Resolve the volunteer behind `email` and check the caller may act on it.
async fn owned_volunteer(state: &AppState, user: &AuthUser, email: &str) -> AppResult<Volunteer> {
    ensure_self_or_admin(user, email)?;
    let volunteer = VolunteerRepo::find_by_email(&state.pool, email.trim())
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::NotFoundByEmail {
                entity: "Volunteer",
                email: email.to_string(),
            })
        })?;
    ensure_owner_or_admin(user, volunteer.id)?;
    Ok(volunteer)
}

/// POST /api/volunteer/apply-for-time-slot
///
/// Create a `Pending` application on a qualifying date and tell the admins.
pub async fn apply_for_time_slot(
    user: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<SlotRequest>,
) -> AppResult<impl IntoResponse> {
    ensure_self_or_admin(&user, &input.email)?;

    let volunteer = schedulable_volunteer(&state, &input.email).await?;
    ensure_owner_or_admin(&user, volunteer.id)?;
    ensure_qualifying_date(&state, input.application_date).await?;
    existing_slot(&state, input.slot_id).await?;

    let application = ApplicationRepo::create(
        &state.pool,
        &CreateApplication {
            volunteer_id: volunteer.id,
            slot_id: input.slot_id,
            date: input.application_date,
            status: ApplicationStatus::Pending,
        },
    )
    .await?;
    forget_cached_recommendations(&state).await;

    tracing::info!(
        application_id = application.id,
        volunteer_id = volunteer.id,
        slot_id = application.slot_id,
        date = %application.date,
        "Shift application submitted"
    );

    notify_admins(
        &state,
        MessageKey::NewTimeSlot,
        MessageData::default().with_name(volunteer.full_name()),
    );

    Ok(Json(
        ApiResponse::data(application).with_message("Application submitted successfully"),
    ))
}

/// GET /api/volunteer/applied-time-slots/{email}
///
/// The volunteer's pending applications.
pub async fn applied_time_slots(
    user: AuthUser,
    State(state): State<AppState>,
    Path(email): Path<String>,
) -> AppResult<impl IntoResponse> {
    let volunteer = owned_volunteer(&state, &user, &email).await?;

    let applications = ApplicationRepo::list_details_for_volunteer(
        &state.pool,
        volunteer.id,
        &[ApplicationStatus::Pending],
    )
    .await?;

    Ok(Json(ApiResponse::data(applications)))
}

/// GET /api/volunteer/my-time-slots/{email}
///
/// The volunteer's scheduled shifts, including ones with a pending
/// cancellation request.
pub async fn my_time_slots(
    user: AuthUser,
    State(state): State<AppState>,
    Path(email): Path<String>,
) -> AppResult<impl IntoResponse> {
    let volunteer = owned_volunteer(&state, &user, &email).await?;

    let applications = ApplicationRepo::list_details_for_volunteer(
        &state.pool,
        volunteer.id,
        &[
            ApplicationStatus::Approved,
            ApplicationStatus::CancellationRequested,
        ],
    )
    .await?;

    Ok(Json(ApiResponse::data(applications)))
}

/// GET /api/volunteer/cancellation-requests/{email}
pub async fn cancellation_requests(
    user: AuthUser,
    State(state): State<AppState>,
    Path(email): Path<String>,
) -> AppResult<impl IntoResponse> {
    let volunteer = owned_volunteer(&state, &user, &email).await?;

    let applications = ApplicationRepo::list_details_for_volunteer(
        &state.pool,
        volunteer.id,
        &[ApplicationStatus::CancellationRequested],
    )
    .await?;

    Ok(Json(ApiResponse::data(applications)))
}

/// POST /api/volunteer/request-cancellation
///
/// `Approved` -> `CancellationRequested` with a reason; the admins decide.
pub async fn request_cancellation(
    user: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<CancellationRequestBody>,
) -> AppResult<impl IntoResponse> {
    let reason = input.reason.trim();
    if reason.is_empty() {
        return Err(AppError::BadRequest(
            "Application ID and reason are required".into(),
        ));
    }

    let detail = existing_detail(&state, input.application_id).await?;
    if !user.is_admin && !user.is_volunteer(detail.volunteer_id) {
        return Err(AppError::forbidden("You can only cancel your own shifts"));
    }

    ApplicationRepo::request_cancellation(&state.pool, input.application_id, reason)
        .await?
        .ok_or_else(|| AppError::conflict("Only approved applications can be cancelled"))?;

    tracing::info!(
        application_id = input.application_id,
        volunteer_id = detail.volunteer_id,
        "Cancellation requested"
    );

    notify_admins(
        &state,
        MessageKey::CancellationRequest,
        shift_message_data(&detail).with_reason(reason),
    );

    Ok(Json(ApiResponse::message(
        "Cancellation request submitted successfully",
    )))
}
