//! Repository for the `tracked_petitions` table.

use petitions_core::milestone::Milestone;
use petitions_core::types::{PetitionId, TrackingId};
use sqlx::PgPool;

use crate::models::tracked_petition::{CreateTrackedPetition, TrackOutcome, TrackedPetition};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, petition_id, petition_title, current_signatures, \
    notify_at_10k, notify_at_100k, notified_10k, notified_100k, created_at";

/// Provides the tracking store operations.
pub struct TrackedPetitionRepo;

impl TrackedPetitionRepo {
    /// Insert a tracking record unless the petition is already tracked.
    pub async fn track(
        pool: &PgPool,
        input: &CreateTrackedPetition,
    ) -> Result<TrackOutcome, sqlx::Error> {
        let query = format!(
            "INSERT INTO tracked_petitions \
                (id, petition_id, petition_title, current_signatures, \
                 notify_at_10k, notify_at_100k, notified_10k, notified_100k) \
             VALUES ($1, $2, $3, $4, \
                 COALESCE($5, true), COALESCE($6, true), COALESCE($7, false), COALESCE($8, false)) \
             ON CONFLICT (petition_id) DO NOTHING \
             RETURNING {COLUMNS}"
        );
        let row = sqlx::query_as::<_, TrackedPetition>(&query)
            .bind(TrackingId::now_v7())
            .bind(input.petition_id)
            .bind(&input.petition_title)
            .bind(input.current_signatures)
            .bind(input.notify_at_10k)
            .bind(input.notify_at_100k)
            .bind(input.notified_10k)
            .bind(input.notified_100k)
            .fetch_optional(pool)
            .await?;

        Ok(match row {
            Some(tracked) => TrackOutcome::Created(tracked),
            None => TrackOutcome::AlreadyExists,
        })
    }

    /// Delete every record for `petition_id`. Returns the number removed.
    pub async fn untrack(pool: &PgPool, petition_id: PetitionId) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM tracked_petitions WHERE petition_id = $1")
            .bind(petition_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected())
    }

    /// List all tracked petitions, newest first.
    pub async fn list(pool: &PgPool) -> Result<Vec<TrackedPetition>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM tracked_petitions ORDER BY created_at DESC");
        sqlx::query_as::<_, TrackedPetition>(&query)
            .fetch_all(pool)
            .await
    }

    pub async fn is_tracking(pool: &PgPool, petition_id: PetitionId) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS (SELECT 1 FROM tracked_petitions WHERE petition_id = $1)",
        )
        .bind(petition_id)
        .fetch_one(pool)
        .await
    }

    pub async fn find_by_petition_id(
        pool: &PgPool,
        petition_id: PetitionId,
    ) -> Result<Option<TrackedPetition>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM tracked_petitions WHERE petition_id = $1");
        sqlx::query_as::<_, TrackedPetition>(&query)
            .bind(petition_id)
            .fetch_optional(pool)
            .await
    }

    /// Records with at least one requested milestone not yet delivered,
    /// oldest first.
    pub async fn list_pending_milestones(
        pool: &PgPool,
    ) -> Result<Vec<TrackedPetition>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM tracked_petitions \
             WHERE (notify_at_10k AND NOT notified_10k) \
                OR (notify_at_100k AND NOT notified_100k) \
             ORDER BY created_at"
        );
        sqlx::query_as::<_, TrackedPetition>(&query)
            .fetch_all(pool)
            .await
    }

    /// Flag `milestone` as delivered for record `id`.
    ///
    /// Returns `false` if the record is gone or the flag was already set.
    pub async fn mark_notified(
        pool: &PgPool,
        id: TrackingId,
        milestone: Milestone,
    ) -> Result<bool, sqlx::Error> {
        let query = match milestone {
            Milestone::TenThousand => {
                "UPDATE tracked_petitions SET notified_10k = true \
                 WHERE id = $1 AND notified_10k = false"
            }
            Milestone::HundredThousand => {
                "UPDATE tracked_petitions SET notified_100k = true \
                 WHERE id = $1 AND notified_100k = false"
            }
        };
        let result = sqlx::query(query).bind(id).execute(pool).await?;
        Ok(result.rows_affected() > 0)
    }
}
