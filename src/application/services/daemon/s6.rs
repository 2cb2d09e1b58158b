//! s6 backend: service directory with `run`/`down` files and `s6-svc`
//! signalling.

use crate::application::ports::{CommandRunner, LocalFs};
use crate::application::services::daemon::render::{self, RenderContext};
use crate::application::services::daemon::{fs_error, run_checked, write_descriptor};
use crate::domain::backend::{
    Descriptor, S6_DOWN_FILE, S6_LOG_DIR, S6_RUN_FILE, SERVICE_DIR_MODE, SERVICE_FILE_MODE,
    TemplateId,
};
use crate::domain::error::DaemonError;

/// Write the service directory: the `run` script plus a `log/run` logger,
/// creating both directories first.
pub(super) fn install(
    descriptor: &Descriptor,
    content: &[u8],
    vars: &RenderContext,
    fs: &impl LocalFs,
) -> Result<(), DaemonError> {
    let service_dir = descriptor.service_dir();
    let log_dir = service_dir.join(S6_LOG_DIR);
    fs.create_dir_all(&service_dir, SERVICE_DIR_MODE)
        .map_err(|e| fs_error(&service_dir, e))?;
    fs.create_dir_all(&log_dir, SERVICE_DIR_MODE)
        .map_err(|e| fs_error(&log_dir, e))?;

    write_descriptor(fs, &descriptor.path, content)?;

    let log_run = render::render(TemplateId::S6LogRun, vars)?;
    write_descriptor(fs, &log_dir.join(S6_RUN_FILE), &log_run)
}

/// Start by removing the `down` sentinel and touching the run file to
/// trigger a supervisor rescan; fall back to `s6-svc -u` only if the rescan
/// trigger fails.
pub(super) async fn start(
    descriptor: &Descriptor,
    host: &impl CommandRunner,
    fs: &impl LocalFs,
) -> Result<(), DaemonError> {
    let service_dir = descriptor.service_dir();
    let down = service_dir.join(S6_DOWN_FILE);
    if fs.exists(&down) {
        fs.remove_file(&down).map_err(|e| fs_error(&down, e))?;
    }

    let run_path = descriptor.path.display().to_string();
    let touched = host.run("touch", &[&run_path]).await;
    if matches!(&touched, Ok(output) if output.status.success()) {
        return Ok(());
    }

    let dir = service_dir.display().to_string();
    run_checked(host, "start", "s6-svc", &["-u", &dir]).await
}

/// Stop by writing the `down` sentinel (so the service stays down across a
/// rescan) and signalling the supervisor.
pub(super) async fn stop(
    descriptor: &Descriptor,
    host: &impl CommandRunner,
    fs: &impl LocalFs,
) -> Result<(), DaemonError> {
    let service_dir = descriptor.service_dir();
    let down = service_dir.join(S6_DOWN_FILE);
    fs.write(&down, b"", SERVICE_FILE_MODE)
        .map_err(|e| fs_error(&down, e))?;

    let dir = service_dir.display().to_string();
    run_checked(host, "stop", "s6-svc", &["-d", &dir]).await
}

/// Reload via the supervisor's HUP signal.
pub(super) async fn reload(
    descriptor: &Descriptor,
    host: &impl CommandRunner,
) -> Result<(), DaemonError> {
    let dir = descriptor.service_dir().display().to_string();
    run_checked(host, "reload", "s6-svc", &["-h", &dir]).await
}

/// Remove the whole service directory; already absent is success.
pub(super) fn destroy(descriptor: &Descriptor, fs: &impl LocalFs) -> Result<(), DaemonError> {
    let service_dir = descriptor.service_dir();
    if !fs.exists(&service_dir) {
        return Ok(());
    }
    fs.remove_dir_all(&service_dir)
        .map_err(|e| fs_error(&service_dir, e))
}
