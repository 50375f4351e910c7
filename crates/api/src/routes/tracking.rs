//! Route definitions for petition tracking.

use axum::routing::{delete, get, post};
use axum::Router;

use crate::handlers::tracking;
use crate::state::AppState;

/// Tracking routes, merged at the API root.
///
/// ```text
/// POST   /track                        -> track
/// DELETE /track/{petition_id}          -> untrack
/// GET    /track/{petition_id}/status   -> status
/// GET    /tracked                      -> list
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/track", post(tracking::track))
        .route("/track/{petition_id}", delete(tracking::untrack))
        .route("/track/{petition_id}/status", get(tracking::status))
        .route("/tracked", get(tracking::list))
}
