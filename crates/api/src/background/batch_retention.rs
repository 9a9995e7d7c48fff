//! Periodic removal of expired COMPLETED batches.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tdm_core::orchestrator::GenerationOrchestrator;
use tokio_util::sync::CancellationToken;

/// Run the expiration sweep every `every` until `cancel` fires.
///
/// The first sweep happens immediately. A failed sweep is logged and the
/// loop carries on.
pub async fn run(
    orchestrator: Arc<GenerationOrchestrator>,
    every: Duration,
    cancel: CancellationToken,
) {
    tracing::info!(interval_secs = every.as_secs(), "Batch retention job started");

    let mut interval = tokio::time::interval(every);

    loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                tracing::info!("Batch retention job stopping");
                break;
            }
            _ = interval.tick() => {
                match orchestrator.cleanup_expired(Utc::now()).await {
                    Ok(0) => tracing::debug!("Batch retention: nothing to purge"),
                    Ok(deleted) => tracing::info!(deleted, "Batch retention: purged expired batches"),
                    Err(e) => tracing::error!(error = %e, "Batch retention: sweep failed"),
                }
            }
        }
    }
}
