//! Route definitions for the `/slots` resource.

use axum::routing::{get, post, put};
use axum::Router;

use crate::handlers::slot;
use crate::state::AppState;

/// Routes mounted at `/slots`.
///
/// ```text
/// GET    /            -> list_slots (public)
/// POST   /            -> create_slot
/// POST   /seed        -> seed_slots
/// PUT    /{slot_id}   -> update_slot
/// DELETE /{slot_id}   -> delete_slot
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(slot::list_slots).post(slot::create_slot))
        .route("/seed", post(slot::seed_slots))
        .route("/{slot_id}", put(slot::update_slot).delete(slot::delete_slot))
}
