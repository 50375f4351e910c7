//! Route definitions for petitions.

use axum::routing::get;
use axum::Router;

use crate::handlers::petitions;
use crate::state::AppState;

/// Routes mounted at `/petitions`.
///
/// ```text
/// GET  /       -> list
/// GET  /{id}   -> get_by_id
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(petitions::list))
        .route("/{id}", get(petitions::get_by_id))
}
