pub mod health;
pub mod petitions;
pub mod tracking;

use axum::Router;

use crate::state::AppState;

/// Build the `/api` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /petitions                        list (?status, sort, signatureRange, search, page)
/// /petitions/{id}                   get one petition
///
/// /track                            track a petition (POST)
/// /track/{petition_id}              untrack (DELETE)
/// /track/{petition_id}/status       tracking status (GET)
/// /tracked                          list tracked petitions (GET)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        // Read-through petition listing and lookup.
        .nest("/petitions", petitions::router())
        // Milestone tracking.
        .merge(tracking::router())
}
