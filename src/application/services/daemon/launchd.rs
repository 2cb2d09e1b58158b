//! launchd backend: `launchctl {load|unload} -w` on the plist.

use crate::application::ports::CommandRunner;
use crate::application::services::daemon::run_checked;
use crate::domain::backend::Descriptor;
use crate::domain::error::DaemonError;

pub(super) async fn start(
    descriptor: &Descriptor,
    host: &impl CommandRunner,
) -> Result<(), DaemonError> {
    let plist = descriptor.path.display().to_string();
    run_checked(host, "start", "launchctl", &["load", "-w", &plist]).await
}

pub(super) async fn stop(
    descriptor: &Descriptor,
    host: &impl CommandRunner,
) -> Result<(), DaemonError> {
    let plist = descriptor.path.display().to_string();
    run_checked(host, "stop", "launchctl", &["unload", "-w", &plist]).await
}

/// launchd has no native reload: stop, then start. A failed stop aborts the
/// reload and its error surfaces unchanged; start is never attempted.
pub(super) async fn reload(
    descriptor: &Descriptor,
    host: &impl CommandRunner,
) -> Result<(), DaemonError> {
    stop(descriptor, host).await?;
    start(descriptor, host).await
}
