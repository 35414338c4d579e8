//! Route definitions for the `/holidays` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::holiday;
use crate::state::AppState;

/// Routes mounted at `/holidays`.
///
/// ```text
/// GET /{year}  -> get_holidays (public)
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/{year}", get(holiday::get_holidays))
}
