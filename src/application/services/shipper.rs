//! Telemetry shipping loop — forwards stored records to the collector.
//!
//! On every tick, records newer than the last shipped watermark are sent
//! through the telemetry sink. A failed send is logged and retried on the
//! next tick: the watermark only advances when the batch is delivered.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use chrono::{DateTime, Utc};
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;

use crate::application::ports::{RetentionStore, TelemetrySink};
use crate::domain::telemetry::AuthContext;

/// Run the shipping loop until cancelled.
///
/// # Errors
///
/// Returns an error only if the store itself fails; delivery failures are
/// retried, not propagated.
pub async fn run<S>(
    store: Arc<S>,
    sink: &impl TelemetrySink,
    auth: &AuthContext,
    interval: Duration,
    cancel: CancellationToken,
) -> Result<()>
where
    S: RetentionStore + Send + Sync + 'static,
{
    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    let mut command_watermark = DateTime::<Utc>::MIN_UTC;
    let mut process_watermark = DateTime::<Utc>::MIN_UTC;

    loop {
        tokio::select! {
            () = cancel.cancelled() => return Ok(()),
            _ = ticker.tick() => {
                command_watermark =
                    ship_commands(store.as_ref(), sink, auth, command_watermark).await?;
                process_watermark =
                    ship_processes(store.as_ref(), sink, auth, process_watermark).await?;
            }
        }
    }
}

async fn ship_commands(
    store: &impl RetentionStore,
    sink: &impl TelemetrySink,
    auth: &AuthContext,
    watermark: DateTime<Utc>,
) -> Result<DateTime<Utc>> {
    let batch = store.commands_since(watermark)?;
    if batch.is_empty() {
        return Ok(watermark);
    }
    match sink.send_commands(&batch, auth).await {
        Ok(()) => {
            tracing::debug!(count = batch.len(), "shipped command batch");
            Ok(batch
                .iter()
                .map(|r| r.recorded_at)
                .max()
                .unwrap_or(watermark))
        }
        Err(e) => {
            tracing::warn!("failed to ship commands, will retry: {e:#}");
            Ok(watermark)
        }
    }
}

async fn ship_processes(
    store: &impl RetentionStore,
    sink: &impl TelemetrySink,
    auth: &AuthContext,
    watermark: DateTime<Utc>,
) -> Result<DateTime<Utc>> {
    let batch = store.processes_since(watermark)?;
    if batch.is_empty() {
        return Ok(watermark);
    }
    match sink.send_processes(&batch, auth).await {
        Ok(()) => {
            tracing::debug!(count = batch.len(), "shipped process batch");
            Ok(batch
                .iter()
                .map(|r| r.recorded_at)
                .max()
                .unwrap_or(watermark))
        }
        Err(e) => {
            tracing::warn!("failed to ship processes, will retry: {e:#}");
            Ok(watermark)
        }
    }
}
