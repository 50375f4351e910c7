//! Tracked petition entity model and DTOs.
//!
//! JSON uses camelCase (`petitionId`, `notifyAt10k`, ...) to match the
//! dashboard client; columns are snake_case.

use petitions_core::milestone::MilestoneFlags;
use petitions_core::types::{PetitionId, Timestamp, TrackingId};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `tracked_petitions` table.
///
/// `petition_title` and `current_signatures` are snapshots taken when the
/// petition was tracked and are not refreshed.
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackedPetition {
    pub id: TrackingId,
    pub petition_id: PetitionId,
    pub petition_title: String,
    pub current_signatures: i64,
    pub notify_at_10k: bool,
    pub notify_at_100k: bool,
    pub notified_10k: bool,
    pub notified_100k: bool,
    pub created_at: Timestamp,
}

impl TrackedPetition {
    pub fn milestone_flags(&self) -> MilestoneFlags {
        MilestoneFlags {
            notify_at_10k: self.notify_at_10k,
            notify_at_100k: self.notify_at_100k,
            notified_10k: self.notified_10k,
            notified_100k: self.notified_100k,
        }
    }
}

/// DTO for tracking a petition. Flags default to notify on both milestones,
/// nothing delivered yet.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTrackedPetition {
    pub petition_id: PetitionId,
    pub petition_title: String,
    pub current_signatures: i64,
    pub notify_at_10k: Option<bool>,
    pub notify_at_100k: Option<bool>,
    pub notified_10k: Option<bool>,
    pub notified_100k: Option<bool>,
}

/// Result of a track request.
#[derive(Debug, Clone)]
pub enum TrackOutcome {
    /// A new record was inserted.
    Created(TrackedPetition),
    /// The petition was already tracked; nothing was written.
    AlreadyExists,
}
