//! Periodic retention cleanup, bound to the owning process's lifetime.
//!
//! The job is a cancellable scheduled task with an explicit handle — not a
//! detached loop — so shutting the process down releases the scheduling
//! resource. Store errors are logged and the loop keeps ticking.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;

use crate::application::ports::RetentionStore;

/// Handle to the running cleanup task.
pub struct RetentionJob {
    handle: JoinHandle<()>,
    cancel: CancellationToken,
}

impl RetentionJob {
    /// Spawn the cleanup loop: every `every`, delete commands and process
    /// samples older than `days`. The first sweep runs one full period after
    /// spawn.
    pub fn spawn<S>(store: Arc<S>, every: Duration, days: u32) -> Self
    where
        S: RetentionStore + Send + Sync + 'static,
    {
        let cancel = CancellationToken::new();
        let token = cancel.clone();

        let handle = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(every);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            // tokio intervals fire immediately; skip that tick so the sweep
            // cadence starts one period out.
            ticker.tick().await;

            loop {
                tokio::select! {
                    () = token.cancelled() => break,
                    _ = ticker.tick() => sweep(store.as_ref(), days),
                }
            }
        });

        Self { handle, cancel }
    }

    /// Cancel the loop and wait for the task to finish.
    pub async fn shutdown(self) {
        self.cancel.cancel();
        let _ = self.handle.await;
    }
}

fn sweep(store: &impl RetentionStore, days: u32) {
    match store.delete_commands_older_than(days) {
        Ok(removed) => tracing::debug!(removed, "retention sweep removed commands"),
        Err(e) => tracing::warn!("retention sweep failed deleting commands: {e:#}"),
    }
    match store.delete_processes_older_than(days) {
        Ok(removed) => tracing::debug!(removed, "retention sweep removed processes"),
        Err(e) => tracing::warn!("retention sweep failed deleting processes: {e:#}"),
    }
}
