//! Unit tests for the retention cleanup job.

#![allow(clippy::expect_used)]

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use anyhow::Result;
use chrono::{DateTime, Utc};
use oda_cli::application::ports::RetentionStore;
use oda_cli::application::services::retention::RetentionJob;
use oda_cli::domain::telemetry::{CommandRecord, ProcessRecord};

#[derive(Default)]
struct CountingStore {
    command_sweeps: AtomicUsize,
    process_sweeps: AtomicUsize,
}

impl RetentionStore for CountingStore {
    fn commands_since(&self, _since: DateTime<Utc>) -> Result<Vec<CommandRecord>> {
        Ok(Vec::new())
    }

    fn processes_since(&self, _since: DateTime<Utc>) -> Result<Vec<ProcessRecord>> {
        Ok(Vec::new())
    }

    fn delete_commands_older_than(&self, days: u32) -> Result<usize> {
        assert_eq!(days, 5);
        self.command_sweeps.fetch_add(1, Ordering::SeqCst);
        Ok(0)
    }

    fn delete_processes_older_than(&self, days: u32) -> Result<usize> {
        assert_eq!(days, 5);
        self.process_sweeps.fetch_add(1, Ordering::SeqCst);
        Ok(0)
    }
}

#[tokio::test(start_paused = true)]
async fn job_sweeps_on_schedule_and_stops_on_shutdown() {
    let store = Arc::new(CountingStore::default());
    let job = RetentionJob::spawn(Arc::clone(&store), Duration::from_secs(3600), 5);

    tokio::time::sleep(Duration::from_secs(2 * 3600 + 30)).await;
    job.shutdown().await;

    let commands = store.command_sweeps.load(Ordering::SeqCst);
    let processes = store.process_sweeps.load(Ordering::SeqCst);
    assert!(commands >= 1, "no command sweep ran");
    assert_eq!(commands, processes, "both tables sweep together");

    let after_shutdown = store.command_sweeps.load(Ordering::SeqCst);
    tokio::time::sleep(Duration::from_secs(10 * 3600)).await;
    assert_eq!(
        store.command_sweeps.load(Ordering::SeqCst),
        after_shutdown,
        "job kept sweeping after shutdown"
    );
}

#[tokio::test(start_paused = true)]
async fn shutdown_before_first_tick_completes_cleanly() {
    let store = Arc::new(CountingStore::default());
    let job = RetentionJob::spawn(Arc::clone(&store), Duration::from_secs(3600), 5);
    job.shutdown().await;
    assert_eq!(store.command_sweeps.load(Ordering::SeqCst), 0);
}
