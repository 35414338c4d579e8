//! Route definitions for the `/admin` resource.

use axum::routing::{delete, get, post, put};
use axum::Router;

use crate::handlers::admin;
use crate::state::AppState;

/// Routes mounted at `/admin`. All require the admin role.
///
/// ```text
/// POST   /verify-time-slot-application      -> verify_time_slot_application
/// POST   /verify-new-volunteer-application  -> verify_new_volunteer_application
/// DELETE /delete-application                -> delete_application
/// PUT    /update-application                -> update_application
/// GET    /pending-volunteers                -> pending_volunteers
/// GET    /approved-volunteers               -> approved_volunteers
/// GET    /cancellation-requests             -> cancellation_requests
/// POST   /approve-cancellation              -> approve_cancellation
/// POST   /reject-cancellation               -> reject_cancellation
/// POST   /assign-time-slot                  -> assign_time_slot
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/verify-time-slot-application",
            post(admin::verify_time_slot_application),
        )
        .route(
            "/verify-new-volunteer-application",
            post(admin::verify_new_volunteer_application),
        )
        .route("/delete-application", delete(admin::delete_application))
        .route("/update-application", put(admin::update_application))
        .route("/pending-volunteers", get(admin::pending_volunteers))
        .route("/approved-volunteers", get(admin::approved_volunteers))
        .route("/cancellation-requests", get(admin::cancellation_requests))
        .route("/approve-cancellation", post(admin::approve_cancellation))
        .route("/reject-cancellation", post(admin::reject_cancellation))
        .route("/assign-time-slot", post(admin::assign_time_slot))
}
