//! `oda start` — enable and launch the daemon service.

use anyhow::{Context, Result};

use crate::app::AppContext;
use crate::application::services::daemon;
use crate::infra::host;

/// Run `oda start`.
///
/// # Errors
///
/// Returns an error if the daemon cannot be started.
pub async fn run(app: &AppContext) -> Result<()> {
    let cfg = host::agent_config(false, false, &[], "start")?;

    app.output.info("Starting ODA daemon...");
    daemon::start(&cfg, &app.host, &app.fs)
        .await
        .context("failed to start ODA daemon")?;

    app.output.success("ODA daemon started.");
    Ok(())
}
