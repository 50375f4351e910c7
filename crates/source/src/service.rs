//! Petition listing and lookup on top of the fetch cache.

use petitions_core::petition::{
    Links, PaginationMeta, Petition, PetitionEnvelope, PetitionsEnvelope,
};
use petitions_core::query::PetitionQuery;
use petitions_core::types::PetitionId;
use serde::Deserialize;
use serde_json::Value;

use crate::api::SourceError;
use crate::cache::FetchCache;

/// A list page whose items have not been decoded yet, so one malformed
/// petition does not fail the whole page.
#[derive(Deserialize)]
struct RawPage {
    data: Vec<Value>,
    links: Links,
    #[serde(default)]
    meta: Option<PaginationMeta>,
}

/// Read-through view of upstream petitions.
pub struct PetitionSource {
    cache: FetchCache,
}

impl PetitionSource {
    pub fn new(cache: FetchCache) -> Self {
        Self { cache }
    }

    /// Fetch the upstream page selected by `query` and apply the local
    /// search, range and sort steps to it.
    pub async fn list_petitions(
        &self,
        query: &PetitionQuery,
    ) -> Result<PetitionsEnvelope, SourceError> {
        let payload = self.cache.get(&query.endpoint()).await?;
        let page: RawPage = serde_json::from_value(payload)?;
        let fetched = page.data.len();

        let data: Vec<Petition> = page
            .data
            .into_iter()
            .filter_map(|item| match serde_json::from_value::<Petition>(item) {
                Ok(petition) => Some(petition),
                Err(e) => {
                    tracing::warn!(error = %e, "Skipping malformed petition in list page");
                    None
                }
            })
            .collect();
        let envelope = PetitionsEnvelope {
            data,
            links: page.links,
            meta: page.meta,
        };

        let envelope = query.apply(envelope);
        tracing::debug!(
            %query,
            fetched,
            returned = envelope.data.len(),
            "Applied petition query"
        );
        Ok(envelope)
    }

    /// Look up one petition. Any failure (upstream error, timeout, malformed
    /// payload, missing `data`) is logged and reported as `None`.
    pub async fn find_petition(&self, id: PetitionId) -> Option<Petition> {
        let payload = match self.cache.get(&format!("/petitions/{id}.json")).await {
            Ok(payload) => payload,
            Err(e) => {
                tracing::warn!(petition_id = id, error = %e, "Error fetching petition");
                return None;
            }
        };

        match serde_json::from_value::<PetitionEnvelope>(payload) {
            Ok(envelope) => envelope.data,
            Err(e) => {
                tracing::warn!(petition_id = id, error = %e, "Malformed petition payload");
                None
            }
        }
    }
}
