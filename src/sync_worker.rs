// Background Sync Worker
// One logical worker for the lifetime of the process: tick, reload, repeat.
// A failed reload is retried at the next tick; shutdown is signalled through
// a watch channel so tests and process teardown can stop it deterministically.

use std::sync::Arc;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{interval, MissedTickBehavior};
use tracing::{info, warn};

use crate::observability::{log_operation, Operation, OperationContext};
use crate::reload::IndexBuilder;

/// Handle to a running sync worker. Dropping the handle does not stop the
/// worker; call [`SyncWorkerHandle::shutdown`] for a deterministic stop.
pub struct SyncWorkerHandle {
    shutdown_tx: watch::Sender<bool>,
    join: JoinHandle<()>,
}

impl SyncWorkerHandle {
    /// Signal the worker to stop and wait for it to finish. A reload already
    /// in flight runs to completion first.
    pub async fn shutdown(self) {
        let _ = self.shutdown_tx.send(true);
        let _ = self.join.await;
    }
}

/// Spawn the periodic reload task.
///
/// Ticks at the configured interval with delayed catch-up: if a rebuild
/// outlasts the interval, the next cycle starts after completion instead of
/// overlapping, so at most one rebuild is in flight.
pub fn spawn_sync_worker(builder: Arc<IndexBuilder>) -> SyncWorkerHandle {
    let (shutdown_tx, mut shutdown_rx) = watch::channel(false);
    let period = builder.config().reload_interval;

    let join = tokio::spawn(async move {
        let mut ticker = interval(period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // The first tick of tokio's interval fires immediately; consume it so
        // the first reload happens one full period after startup, matching
        // the warm-up reload done at wiring time.
        ticker.tick().await;

        info!(interval = ?period, "Sync worker started");
        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    if let Err(e) = builder.reload().await {
                        warn!("Scheduled reload failed, will retry next cycle: {e:#}");
                    }
                }
                _ = shutdown_rx.changed() => {
                    let ctx = OperationContext::new("sync_worker.shutdown");
                    log_operation(
                        &ctx,
                        &Operation::Shutdown {
                            reason: "shutdown signal received".to_string(),
                        },
                        &Ok(()),
                    );
                    break;
                }
            }
        }
    });

    SyncWorkerHandle { shutdown_tx, join }
}
