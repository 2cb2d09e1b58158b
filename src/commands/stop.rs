//! `oda stop` — stop the daemon service.

use anyhow::{Context, Result};

use crate::app::AppContext;
use crate::application::services::daemon;
use crate::infra::host;

/// Run `oda stop`.
///
/// # Errors
///
/// Returns an error if the daemon cannot be stopped.
pub async fn run(app: &AppContext) -> Result<()> {
    let cfg = host::agent_config(false, false, &[], "stop")?;

    app.output.info("Stopping ODA daemon...");
    daemon::stop(&cfg, &app.host, &app.fs)
        .await
        .context("failed to stop ODA daemon")?;

    app.output.success("ODA daemon stopped.");
    Ok(())
}
