//! Periodic milestone notifications for tracked petitions.
//!
//! Every interval, loads the tracked petitions that still have an
//! undelivered milestone, looks up their live signature counts through the
//! shared fetch cache, and delivers any milestone that has been crossed.
//! Delivery is a structured log event on the `petitions::notify` target;
//! the flag is set before the event is emitted so a milestone is announced
//! at most once.

use std::sync::Arc;
use std::time::Duration;

use petitions_core::milestone::Milestone;
use petitions_db::models::tracked_petition::TrackedPetition;
use petitions_db::repositories::TrackedPetitionRepo;
use petitions_source::PetitionSource;
use sqlx::PgPool;
use tokio_util::sync::CancellationToken;

/// Run the milestone sweep loop until `cancel` is triggered.
pub async fn run(
    pool: PgPool,
    petitions: Arc<PetitionSource>,
    interval: Duration,
    cancel: CancellationToken,
) {
    tracing::info!(
        interval_secs = interval.as_secs(),
        "Milestone sweep started"
    );

    let mut ticker = tokio::time::interval(interval);

    loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                tracing::info!("Milestone sweep stopping");
                break;
            }
            _ = ticker.tick() => {
                match sweep(&pool, &petitions).await {
                    Ok(delivered) if delivered > 0 => {
                        tracing::info!(delivered, "Milestone sweep: notifications delivered");
                    }
                    Ok(_) => tracing::debug!("Milestone sweep: nothing due"),
                    Err(e) => {
                        tracing::error!(error = %e, "Milestone sweep: failed to load tracked petitions");
                    }
                }
            }
        }
    }
}

/// One pass over all pending records. Returns the number of milestones
/// delivered.
///
/// Only loading the pending list is fatal; a failed lookup or update for a
/// single record is logged and the pass moves on.
pub async fn sweep(pool: &PgPool, petitions: &PetitionSource) -> Result<usize, sqlx::Error> {
    let pending = TrackedPetitionRepo::list_pending_milestones(pool).await?;
    let mut delivered = 0;

    for tracked in pending {
        let Some(petition) = petitions.find_petition(tracked.petition_id).await else {
            tracing::debug!(
                petition_id = tracked.petition_id,
                "Milestone sweep: petition unavailable, skipping"
            );
            continue;
        };

        let signature_count = petition.attributes.signature_count;
        for milestone in tracked.milestone_flags().due(signature_count) {
            match TrackedPetitionRepo::mark_notified(pool, tracked.id, milestone).await {
                Ok(true) => {
                    notify(&tracked, milestone, signature_count);
                    delivered += 1;
                }
                // Removed or already delivered since the list was loaded.
                Ok(false) => {}
                Err(e) => {
                    tracing::error!(
                        petition_id = tracked.petition_id,
                        milestone = milestone.label(),
                        error = %e,
                        "Milestone sweep: failed to mark milestone delivered"
                    );
                }
            }
        }
    }

    Ok(delivered)
}

fn notify(tracked: &TrackedPetition, milestone: Milestone, signature_count: i64) {
    tracing::info!(
        target: "petitions::notify",
        petition_id = tracked.petition_id,
        title = %tracked.petition_title,
        milestone = milestone.label(),
        threshold = milestone.threshold(),
        signature_count,
        "Petition reached signature milestone"
    );
}
