//! Service backend detection.
//!
//! Pure function of host state: read-only probes only, re-run on every
//! operation and never cached, since correctness must not assume an earlier
//! check. On Linux, s6 takes precedence over systemd whenever it is present.

use std::path::Path;
use std::time::Duration;

use crate::application::ports::{CommandRunner, HostSystem, LocalFs};
use crate::domain::backend::Backend;
use crate::domain::config::OsType;
use crate::domain::error::DaemonError;

/// Timeout for read-only detection probes. A wedged probe must not hang
/// detection the way an actual control command is allowed to.
const PROBE_TIMEOUT: Duration = Duration::from_secs(5);

/// The init binary s6-overlay installs.
const S6_OVERLAY_INIT: &str = "/init";

/// Detect the active service backend for one operation.
///
/// # Errors
///
/// Returns [`DaemonError::SessionManagerUnavailable`] when user-mode systemd
/// is the only candidate and logind is masked, disabled or unreachable.
/// Running as root bypasses the requirement. An unsupported OS is not an
/// error here — it maps to [`Backend::Unavailable`] and fails at the first
/// operation that needs a backend.
pub async fn detect(
    os: OsType,
    is_root: bool,
    host: &impl HostSystem,
    fs: &impl LocalFs,
) -> Result<Backend, DaemonError> {
    match os {
        OsType::Linux => {
            if s6_present(host, fs).await {
                Ok(Backend::S6)
            } else if is_root {
                Ok(Backend::SystemdRoot)
            } else if logind_available(host).await {
                Ok(Backend::SystemdUser)
            } else {
                Err(DaemonError::SessionManagerUnavailable)
            }
        }
        OsType::MacOs => Ok(Backend::Launchd),
        OsType::Unsupported => Ok(Backend::Unavailable),
    }
}

/// Whether the s6 supervision suite is present on this host.
///
/// Checks for an s6-overlay `/init` first, then for the standalone s6 tools
/// on the search path.
async fn s6_present(host: &impl HostSystem, fs: &impl LocalFs) -> bool {
    if fs.exists(Path::new(S6_OVERLAY_INIT)) {
        let probe = host
            .run_with_timeout("grep", &["-q", "s6-overlay", S6_OVERLAY_INIT], PROBE_TIMEOUT)
            .await;
        if matches!(probe, Ok(output) if output.status.success()) {
            return true;
        }
    }

    host.locate("s6-svscan").is_some() && host.locate("s6-svc").is_some()
}

/// Whether the login/session manager is usable for user-mode services.
///
/// Some hosts deliberately disable logind; user-mode systemd units cannot run
/// there, so install/start must fail fast instead of attempting a doomed
/// systemctl invocation.
async fn logind_available(host: &impl CommandRunner) -> bool {
    let probe = host
        .run_with_timeout(
            "systemctl",
            &["is-enabled", "systemd-logind.service"],
            PROBE_TIMEOUT,
        )
        .await;

    match probe {
        Ok(output) => {
            let stdout = String::from_utf8_lossy(&output.stdout);
            let status = stdout.trim();
            output.status.success() && status != "masked" && status != "disabled"
        }
        Err(_) => false,
    }
}
