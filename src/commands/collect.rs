//! `oda collect` — the long-running collection agent.
//!
//! This is the subcommand the installed service runs at boot. It opens the
//! local store, spawns the retention sweep, and ships collected records to
//! the collector until the process is asked to shut down. Both background
//! tasks are cancelled and drained on shutdown.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Args;
use tokio_util::sync::CancellationToken;

use crate::app::{AppContext, init_tracing};
use crate::application::services::retention::RetentionJob;
use crate::application::services::shipper;
use crate::commands::shutdown_signal;
use crate::domain::telemetry::AuthContext;
use crate::infra::host;
use crate::infra::store::{DB_FILE_NAME, SqliteStore};
use crate::infra::telemetry::HttpTelemetryClient;

/// Arguments for the collect command. Mirrors the boot-time invocation
/// written into the service descriptor.
#[derive(Args)]
pub struct CollectArgs {
    /// Try to automatically generate the credentials
    #[arg(short = 'a', long)]
    pub auto_credentials: bool,

    /// Collection runs inside a managed workspace
    #[arg(short = 'w', long)]
    pub workspace: bool,
}

/// Run `oda collect` until SIGINT/SIGTERM.
///
/// # Errors
///
/// Returns an error if the store or telemetry client cannot be set up, or
/// the store fails while shipping.
pub async fn run(app: &AppContext, args: &CollectArgs) -> Result<()> {
    let cfg = host::agent_config(args.auto_credentials, args.workspace, &[], "collect")?;
    let app_cfg = crate::infra::config::load(&cfg.home_dir)?;
    init_tracing(app.verbose || app_cfg.debug);

    let store = Arc::new(
        SqliteStore::open(&cfg.agent_dir().join(DB_FILE_NAME)).context("opening local store")?,
    );
    let sink = HttpTelemetryClient::new(&app_cfg.server)?;
    let auth = AuthContext::from(&app_cfg.auth);

    let retention = RetentionJob::spawn(
        Arc::clone(&store),
        Duration::from_secs(app_cfg.collection.cleanup_interval_hours * 3600),
        app_cfg.collection.retention_days,
    );

    let cancel = CancellationToken::new();
    let shipping = shipper::run(
        Arc::clone(&store),
        &sink,
        &auth,
        Duration::from_secs(app_cfg.collection.flush_interval_secs),
        cancel.clone(),
    );
    tokio::pin!(shipping);

    tracing::info!("collection agent running");
    tokio::select! {
        result = &mut shipping => result?,
        () = shutdown_signal() => {
            tracing::info!("shutting down");
            cancel.cancel();
            shipping.await?;
        }
    }

    retention.shutdown().await;
    Ok(())
}
