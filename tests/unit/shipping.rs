//! Unit tests for the telemetry shipping loop.

#![allow(clippy::expect_used)]

use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use anyhow::Result;
use chrono::{DateTime, Duration as ChronoDuration, Utc};
use oda_cli::application::ports::{RetentionStore, TelemetrySink};
use oda_cli::application::services::shipper;
use oda_cli::domain::telemetry::{AuthContext, CommandRecord, ProcessRecord};
use tokio_util::sync::CancellationToken;

struct StaticStore {
    commands: Vec<CommandRecord>,
}

impl RetentionStore for StaticStore {
    fn commands_since(&self, since: DateTime<Utc>) -> Result<Vec<CommandRecord>> {
        Ok(self
            .commands
            .iter()
            .filter(|record| record.recorded_at > since)
            .cloned()
            .collect())
    }

    fn processes_since(&self, _since: DateTime<Utc>) -> Result<Vec<ProcessRecord>> {
        Ok(Vec::new())
    }

    fn delete_commands_older_than(&self, _days: u32) -> Result<usize> {
        Ok(0)
    }

    fn delete_processes_older_than(&self, _days: u32) -> Result<usize> {
        Ok(0)
    }
}

#[derive(Default)]
struct RecordingSink {
    batches: Mutex<Vec<usize>>,
    fail_first: bool,
    attempts: AtomicUsize,
}

impl TelemetrySink for RecordingSink {
    async fn send_commands(&self, commands: &[CommandRecord], _auth: &AuthContext) -> Result<()> {
        let attempt = self.attempts.fetch_add(1, Ordering::SeqCst);
        if self.fail_first && attempt == 0 {
            anyhow::bail!("collector unreachable");
        }
        self.batches.lock().expect("batches lock").push(commands.len());
        Ok(())
    }

    async fn send_processes(&self, _processes: &[ProcessRecord], _auth: &AuthContext) -> Result<()> {
        Ok(())
    }
}

fn store_with_two_commands(base: DateTime<Utc>) -> Arc<StaticStore> {
    let record = |id: i64, offset: i64| CommandRecord {
        id,
        command: format!("cmd-{id}"),
        directory: "/src".to_string(),
        recorded_at: base + ChronoDuration::seconds(offset),
    };
    Arc::new(StaticStore {
        commands: vec![record(1, 0), record(2, 10)],
    })
}

async fn run_for(
    store: Arc<StaticStore>,
    sink: &RecordingSink,
    wall_seconds: u64,
) {
    let cancel = CancellationToken::new();
    let auth = AuthContext::default();
    let shipping = shipper::run(
        store,
        sink,
        &auth,
        Duration::from_secs(60),
        cancel.clone(),
    );
    tokio::pin!(shipping);

    let canceller = async {
        tokio::time::sleep(Duration::from_secs(wall_seconds)).await;
        cancel.cancel();
        std::future::pending::<()>().await
    };

    tokio::select! {
        result = &mut shipping => result.expect("clean exit"),
        () = canceller => {}
    }
}

#[tokio::test(start_paused = true)]
async fn ships_once_and_advances_watermark() {
    let sink = RecordingSink::default();
    run_for(store_with_two_commands(Utc::now()), &sink, 150).await;

    let batches = sink.batches.lock().expect("batches lock").clone();
    assert_eq!(batches, vec![2], "batch must ship once, then stay shipped");
}

#[tokio::test(start_paused = true)]
async fn failed_send_is_retried_with_same_batch() {
    let sink = RecordingSink {
        fail_first: true,
        ..RecordingSink::default()
    };
    run_for(store_with_two_commands(Utc::now()), &sink, 150).await;

    let batches = sink.batches.lock().expect("batches lock").clone();
    assert_eq!(batches, vec![2], "retried batch must be the full batch");
    assert_eq!(
        sink.attempts.load(Ordering::SeqCst),
        2,
        "one failed attempt plus one successful retry"
    );
}
