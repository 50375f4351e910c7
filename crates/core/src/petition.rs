//! Petition records as served by the UK Parliament petitions API.
//!
//! The types mirror the upstream JSON envelope. Fields this service does not
//! interpret are collected into `extra` maps so they pass through to clients
//! unchanged.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::types::{PetitionId, Timestamp};

/// Lifecycle state of a petition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PetitionState {
    Open,
    Closed,
    Rejected,
    AwaitingResponse,
    AwaitingModeration,
}

/// A single petition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Petition {
    pub id: PetitionId,
    #[serde(rename = "type", default = "default_kind")]
    pub kind: String,
    pub attributes: PetitionAttributes,
    #[serde(default)]
    pub government_response: Option<GovernmentResponse>,
    #[serde(default)]
    pub debate_outcome: Option<DebateOutcome>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

fn default_kind() -> String {
    "petition".to_string()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PetitionAttributes {
    pub action: String,
    #[serde(default)]
    pub background: Option<String>,
    #[serde(default)]
    pub additional_details: Option<String>,
    pub state: PetitionState,
    pub signature_count: i64,
    #[serde(default)]
    pub opened_at: Option<Timestamp>,
    #[serde(default)]
    pub closed_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    #[serde(default)]
    pub rejected_at: Option<Timestamp>,
    #[serde(default)]
    pub rejection_code: Option<String>,
    #[serde(default)]
    pub rejection_details: Option<String>,
    #[serde(default)]
    pub government_response_at: Option<Timestamp>,
    #[serde(default)]
    pub debate_threshold_reached_at: Option<Timestamp>,
    /// Calendar date (`YYYY-MM-DD`), not a timestamp.
    #[serde(default)]
    pub scheduled_debate_date: Option<String>,
    #[serde(default)]
    pub debate_outcome_at: Option<Timestamp>,
    #[serde(default)]
    pub moderation_threshold_reached_at: Option<Timestamp>,
    #[serde(default)]
    pub response_threshold_reached_at: Option<Timestamp>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GovernmentResponse {
    pub responded_on: String,
    pub summary: String,
    pub details: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DebateOutcome {
    pub debated: bool,
    #[serde(default)]
    pub debated_on: Option<String>,
    #[serde(default)]
    pub overview: Option<String>,
    #[serde(default)]
    pub transcript_url: Option<String>,
    #[serde(default)]
    pub video_url: Option<String>,
    #[serde(default)]
    pub debate_pack_url: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Pagination links of a list response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Links {
    #[serde(rename = "self")]
    pub self_link: String,
    pub first: String,
    pub last: String,
    #[serde(default)]
    pub prev: Option<String>,
    #[serde(default)]
    pub next: Option<String>,
}

/// Optional page counters some upstream list responses carry.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PaginationMeta {
    #[serde(default)]
    pub current_page: Option<i64>,
    #[serde(default)]
    pub next_page: Option<i64>,
    #[serde(default)]
    pub prev_page: Option<i64>,
    #[serde(default)]
    pub total_pages: Option<i64>,
}

/// `{ data, links, meta }` list envelope.
///
/// `links` and `meta` always describe the upstream page, even after local
/// filtering has shrunk `data`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PetitionsEnvelope {
    pub data: Vec<Petition>,
    pub links: Links,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<PaginationMeta>,
}

/// Envelope of the single-petition endpoint. A payload without `data`
/// deserializes to `None`.
#[derive(Debug, Clone, Deserialize)]
pub struct PetitionEnvelope {
    #[serde(default)]
    pub data: Option<Petition>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample() -> Value {
        json!({
            "type": "petition",
            "id": 700001,
            "links": { "self": "https://petition.parliament.uk/petitions/700001.json" },
            "attributes": {
                "action": "Fund more rail electrification",
                "background": "Diesel trains are slow.",
                "additional_details": null,
                "state": "open",
                "signature_count": 12034,
                "opened_at": "2024-03-01T09:00:00.000Z",
                "closed_at": null,
                "created_at": "2024-02-20T10:15:00.000Z",
                "updated_at": "2024-03-04T18:00:00.000Z",
                "departments": [{ "name": "Department for Transport" }]
            },
            "government_response": null,
            "debate_outcome": null
        })
    }

    #[test]
    fn deserializes_upstream_petition() {
        let petition: Petition = serde_json::from_value(sample()).unwrap();
        assert_eq!(petition.id, 700001);
        assert_eq!(petition.kind, "petition");
        assert_eq!(petition.attributes.state, PetitionState::Open);
        assert_eq!(petition.attributes.signature_count, 12034);
        assert!(petition.attributes.closed_at.is_none());
        assert!(petition.government_response.is_none());
    }

    #[test]
    fn unknown_fields_pass_through() {
        let petition: Petition = serde_json::from_value(sample()).unwrap();
        let out = serde_json::to_value(&petition).unwrap();
        assert_eq!(
            out["attributes"]["departments"][0]["name"],
            "Department for Transport"
        );
        assert_eq!(
            out["links"]["self"],
            "https://petition.parliament.uk/petitions/700001.json"
        );
    }

    #[test]
    fn awaiting_states_use_snake_case() {
        let state: PetitionState = serde_json::from_value(json!("awaiting_response")).unwrap();
        assert_eq!(state, PetitionState::AwaitingResponse);
        assert_eq!(
            serde_json::to_value(PetitionState::AwaitingModeration).unwrap(),
            json!("awaiting_moderation")
        );
    }

    #[test]
    fn single_envelope_without_data_is_none() {
        let envelope: PetitionEnvelope = serde_json::from_value(json!({ "links": {} })).unwrap();
        assert!(envelope.data.is_none());
    }

    #[test]
    fn list_envelope_omits_missing_meta() {
        let envelope: PetitionsEnvelope = serde_json::from_value(json!({
            "data": [],
            "links": {
                "self": "https://petition.parliament.uk/petitions.json?page=1",
                "first": "https://petition.parliament.uk/petitions.json?page=1",
                "last": "https://petition.parliament.uk/petitions.json?page=1",
                "next": null,
                "prev": null
            }
        }))
        .unwrap();
        assert!(envelope.meta.is_none());
        let out = serde_json::to_value(&envelope).unwrap();
        assert!(out.get("meta").is_none());
    }
}
