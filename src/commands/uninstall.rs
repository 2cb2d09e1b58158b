//! `oda uninstall` — remove the daemon service descriptor.

use anyhow::{Context, Result};

use crate::app::AppContext;
use crate::application::services::daemon;
use crate::infra::host;

/// Run `oda uninstall`.
///
/// # Errors
///
/// Returns an error if the daemon configuration cannot be removed.
pub async fn run(app: &AppContext) -> Result<()> {
    let cfg = host::agent_config(false, false, &[], "uninstall")?;

    app.output.info("Uninstalling ODA daemon...");
    daemon::destroy(&cfg, &app.host, &app.fs)
        .await
        .context("failed to uninstall ODA daemon configuration")?;

    app.output.success("Daemon service files removed.");
    app.output
        .info("~/.oda still holds the local database and config; delete it manually if desired.");
    Ok(())
}
