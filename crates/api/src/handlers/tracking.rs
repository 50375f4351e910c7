//! Handlers for petition tracking.
//!
//! A tracked petition is a request to be notified when it crosses the 10k
//! and 100k signature milestones. The milestone sweep in
//! [`crate::background::milestones`] delivers those notifications.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use petitions_core::error::CoreError;
use petitions_core::tracking::{parse_petition_id, validate_track_request};
use petitions_core::types::PetitionId;
use petitions_db::models::tracked_petition::{CreateTrackedPetition, TrackOutcome};
use petitions_db::repositories::TrackedPetitionRepo;
use serde::Serialize;

use crate::error::{AppError, AppResult};
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Response types
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
pub struct SuccessResponse {
    pub success: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackingStatusResponse {
    pub is_tracking: bool,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/track
///
/// Start tracking a petition. Responds 409 if it is already tracked.
/// Malformed bodies are reported as validation errors.
pub async fn track(
    State(state): State<AppState>,
    payload: Result<Json<CreateTrackedPetition>, JsonRejection>,
) -> AppResult<impl IntoResponse> {
    let Json(input) = payload?;
    validate_track_request(
        input.petition_id,
        &input.petition_title,
        input.current_signatures,
    )?;

    match TrackedPetitionRepo::track(&state.pool, &input).await? {
        TrackOutcome::Created(tracked) => {
            tracing::info!(petition_id = tracked.petition_id, "Petition tracked");
            Ok((StatusCode::CREATED, Json(tracked)))
        }
        TrackOutcome::AlreadyExists => Err(AppError::Core(CoreError::Conflict(format!(
            "Petition {} is already tracked",
            input.petition_id
        )))),
    }
}

/// DELETE /api/track/{petition_id}
///
/// Stop tracking a petition. Succeeds whether or not it was tracked.
pub async fn untrack(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> AppResult<impl IntoResponse> {
    let petition_id = petition_id_from_path(&raw_id)?;
    let removed = TrackedPetitionRepo::untrack(&state.pool, petition_id).await?;
    tracing::info!(petition_id, removed, "Petition untracked");
    Ok(Json(SuccessResponse { success: true }))
}

/// GET /api/tracked
pub async fn list(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let tracked = TrackedPetitionRepo::list(&state.pool).await?;
    Ok(Json(tracked))
}

/// GET /api/track/{petition_id}/status
pub async fn status(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> AppResult<impl IntoResponse> {
    let petition_id = petition_id_from_path(&raw_id)?;
    let is_tracking = TrackedPetitionRepo::is_tracking(&state.pool, petition_id).await?;
    Ok(Json(TrackingStatusResponse { is_tracking }))
}

fn petition_id_from_path(raw: &str) -> AppResult<PetitionId> {
    parse_petition_id(raw).ok_or_else(|| {
        AppError::Core(CoreError::Validation(format!(
            "Invalid petitionId '{raw}'. Must be a positive integer"
        )))
    })
}
