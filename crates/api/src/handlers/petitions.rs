//! Handlers for the `/petitions` resource.
//!
//! Both endpoints read through the fetch cache; nothing here touches the
//! database.

use axum::extract::{Path, Query, State};
use axum::response::IntoResponse;
use axum::Json;
use petitions_core::error::CoreError;
use petitions_core::query::PetitionQuery;
use petitions_core::tracking::parse_petition_id;

use crate::error::{AppError, AppResult};
use crate::query::PetitionListParams;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /api/petitions?status=&sort=&signatureRange=&search=&page=
///
/// List one upstream page of petitions with local search, range filter and
/// sort applied. Options are validated before anything is fetched.
pub async fn list(
    State(state): State<AppState>,
    Query(params): Query<PetitionListParams>,
) -> AppResult<impl IntoResponse> {
    let query = PetitionQuery::from_params(
        params.status.as_deref(),
        params.sort.as_deref(),
        params.signature_range.as_deref(),
        params.search.as_deref(),
        params.page.as_deref(),
    )?;

    let petitions = state.petitions.list_petitions(&query).await?;
    Ok(Json(petitions))
}

/// GET /api/petitions/{id}
///
/// Fetch one petition. Upstream failures of any kind are reported as 404.
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<impl IntoResponse> {
    let petition = match parse_petition_id(&id) {
        Some(petition_id) => state.petitions.find_petition(petition_id).await,
        None => None,
    };

    let petition = petition.ok_or(AppError::Core(CoreError::NotFound {
        entity: "Petition",
        id,
    }))?;
    Ok(Json(petition))
}
