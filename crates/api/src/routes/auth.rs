//! Route definitions for the `/auth` resource.

use axum::routing::{delete, post};
use axum::Router;

use crate::handlers::auth;
use crate::state::AppState;

/// Routes mounted at `/auth`.
///
/// ```text
/// POST   /login               -> login
/// POST   /volunteer-register  -> volunteer_register
/// POST   /admin-register      -> admin_register (admin only)
/// DELETE /delete-user         -> delete_user (self or admin)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/login", post(auth::login))
        .route("/volunteer-register", post(auth::volunteer_register))
        .route("/admin-register", post(auth::admin_register))
        .route("/delete-user", delete(auth::delete_user))
}
