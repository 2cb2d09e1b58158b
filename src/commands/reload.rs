//! `oda reload` — signal the daemon to reload its configuration.

use anyhow::{Context, Result};

use crate::app::AppContext;
use crate::application::services::daemon;
use crate::infra::host;

/// Run `oda reload`.
///
/// # Errors
///
/// Returns an error if the daemon cannot be reloaded.
pub async fn run(app: &AppContext) -> Result<()> {
    let cfg = host::agent_config(false, false, &[], "reload")?;

    app.output.info("Reloading ODA daemon...");
    daemon::reload(&cfg, &app.host, &app.fs)
        .await
        .context("failed to reload ODA daemon")?;

    app.output.success("ODA daemon reloaded.");
    Ok(())
}
