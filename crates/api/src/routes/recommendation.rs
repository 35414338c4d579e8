//! Route definitions for the `/recommendations` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::recommendation;
use crate::state::AppState;

/// Routes mounted at `/recommendations`.
///
/// ```text
/// GET /smart-recommendations/{email}  -> smart_recommendations (self or admin)
/// GET /admin-recommendations          -> admin_recommendations (admin only)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/smart-recommendations/{email}",
            get(recommendation::smart_recommendations),
        )
        .route(
            "/admin-recommendations",
            get(recommendation::admin_recommendations),
        )
}
