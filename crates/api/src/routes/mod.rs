pub mod admin;
pub mod application;
pub mod auth;
pub mod health;
pub mod holiday;
pub mod recommendation;
pub mod slot;
pub mod volunteer;

use axum::Router;

use crate::state::AppState;

/// Build the `/api` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /auth/login                                      login (public)
/// /auth/volunteer-register                         register volunteer (public)
/// /auth/admin-register                             register admin (admin only)
/// /auth/delete-user                                anonymize account (self or admin)
///
/// /volunteer/apply-for-time-slot                   apply (self)
/// /volunteer/applied-time-slots/{email}            pending applications (self)
/// /volunteer/my-time-slots/{email}                 scheduled shifts (self)
/// /volunteer/cancellation-requests/{email}         open cancellation requests (self)
/// /volunteer/request-cancellation                  request cancellation (owner)
///
/// /admin/verify-time-slot-application              approve/reject application
/// /admin/verify-new-volunteer-application          approve/reject account
/// /admin/delete-application                        delete application
/// /admin/update-application                        move application to another slot
/// /admin/pending-volunteers                        list
/// /admin/approved-volunteers                       list
/// /admin/cancellation-requests                     list
/// /admin/approve-cancellation                      delete cancelled application
/// /admin/reject-cancellation                       restore approved application
/// /admin/assign-time-slot                          assign a shift
///
/// /application/approved-timeslots                  all approved (auth)
/// /application/pending-timeslots                   all pending (auth)
///
/// /recommendations/smart-recommendations/{email}   volunteer recommendations (self)
/// /recommendations/admin-recommendations           admin recommendations
///
/// /slots                                           list (public), create (admin)
/// /slots/seed                                      create default slots (admin)
/// /slots/{slot_id}                                 update, delete (admin)
///
/// /holidays/{year}                                 public holidays (public)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router())
        .nest("/volunteer", volunteer::router())
        .nest("/admin", admin::router())
        .nest("/application", application::router())
        .nest("/recommendations", recommendation::router())
        .nest("/slots", slot::router())
        .nest("/holidays", holiday::router())
}
