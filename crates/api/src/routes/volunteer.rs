//! Route definitions for the `/volunteer` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::volunteer;
use crate::state::AppState;

/// Routes mounted at `/volunteer`. All require auth.
///
/// ```text
/// POST /apply-for-time-slot              -> apply_for_time_slot
/// GET  /applied-time-slots/{email}       -> applied_time_slots
/// GET  /my-time-slots/{email}            -> my_time_slots
/// GET  /cancellation-requests/{email}    -> cancellation_requests
/// POST /request-cancellation             -> request_cancellation
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/apply-for-time-slot", post(volunteer::apply_for_time_slot))
        .route("/applied-time-slots/{email}", get(volunteer::applied_time_slots))
        .route("/my-time-slots/{email}", get(volunteer::my_time_slots))
        .route(
            "/cancellation-requests/{email}",
            get(volunteer::cancellation_requests),
        )
        .route("/request-cancellation", post(volunteer::request_cancellation))
}
