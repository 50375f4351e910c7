use std::sync::Arc;

use petitions_source::PetitionSource;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool (tracking store).
    pub pool: petitions_db::DbPool,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Cached read-through access to the upstream petitions API.
    pub petitions: Arc<PetitionSource>,
}
