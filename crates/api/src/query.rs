//! Query parameter types for API handlers.

use serde::Deserialize;

/// Raw `GET /api/petitions` query string.
///
/// Kept as strings so invalid values surface as validation errors with a
/// JSON body rather than extractor rejections.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PetitionListParams {
    pub status: Option<String>,
    pub sort: Option<String>,
    pub signature_range: Option<String>,
    pub search: Option<String>,
    pub page: Option<String>,
}
