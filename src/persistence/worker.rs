//! Background tasks that mirror the in-memory store into PostgreSQL.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tokio::time;

use super::postgres::PostgresPersistence;
use crate::domain::{GameEvent, GameStore};

/// Writes a full store snapshot every `interval`, and prunes the event
/// log down to `retention_days` once per round.
pub fn spawn_snapshot_task(
    persistence: PostgresPersistence,
    store: Arc<GameStore>,
    interval: Duration,
    retention_days: u64,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = time::interval(interval);
        ticker.set_missed_tick_behavior(time::MissedTickBehavior::Delay);
        tracing::info!(interval_secs = interval.as_secs(), "snapshot task started");
        loop {
            ticker.tick().await;
            let snapshot = store.export().await;
            match persistence.save_snapshot(&snapshot).await {
                Ok(rows) => tracing::debug!(rows, "snapshot saved"),
                Err(e) => tracing::error!(error = %e, "snapshot failed"),
            }
            match persistence.delete_old_events(retention_days).await {
                Ok(0) => {}
                Ok(deleted) => tracing::info!(deleted, "pruned event log"),
                Err(e) => tracing::warn!(error = %e, "event log pruning failed"),
            }
        }
    })
}

/// Appends every bus event to the `events` table until the bus closes.
pub fn spawn_event_log_task(
    persistence: PostgresPersistence,
    mut event_rx: broadcast::Receiver<GameEvent>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        loop {
            match event_rx.recv().await {
                Ok(event) => {
                    let payload = match serde_json::to_value(&event) {
                        Ok(payload) => payload,
                        Err(e) => {
                            tracing::error!(error = %e, "failed to encode event");
                            continue;
                        }
                    };
                    if let Err(e) = persistence
                        .save_event(event.user_id().into(), event.event_type_str(), &payload)
                        .await
                    {
                        tracing::error!(error = %e, event_type = event.event_type_str(), "event log write failed");
                    }
                }
                Err(broadcast::error::RecvError::Lagged(n)) => {
                    tracing::warn!(lagged = n, "event log lagged behind event bus");
                }
                Err(broadcast::error::RecvError::Closed) => break,
            }
        }
        tracing::debug!("event log task stopped");
    })
}
