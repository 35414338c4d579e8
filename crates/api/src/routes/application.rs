//! Route definitions for the `/application` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::application;
use crate::state::AppState;

/// Routes mounted at `/application`.
///
/// ```text
/// GET /approved-timeslots  -> approved_timeslots
/// GET /pending-timeslots   -> pending_timeslots
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/approved-timeslots", get(application::approved_timeslots))
        .route("/pending-timeslots", get(application::pending_timeslots))
}
