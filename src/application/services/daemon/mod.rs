//! Daemon lifecycle controller.
//!
//! Exposes the uniform install/start/stop/reload/destroy contract over the
//! host's service backend. Each operation re-detects the backend, resolves
//! the descriptor, and dispatches once into the backend module that owns the
//! platform-specific command sequence. Daemon state (not installed, stopped,
//! running) is implicit in host configuration and never tracked in-process.

pub mod render;

mod launchd;
mod s6;
mod systemd;

use std::path::Path;

use anyhow::Result;

use crate::application::ports::{
    CommandRunner, HostSystem, LocalFs, ProgressReporter, UserDatabase,
};
use crate::application::services::detect;
use crate::domain::backend::{Backend, SERVICE_DIR_MODE, SERVICE_FILE_MODE, resolve_descriptor};
use crate::domain::config::AgentConfig;
use crate::domain::error::DaemonError;

/// Install the service descriptor for the detected backend.
///
/// Idempotent: re-running overwrites the existing descriptor with freshly
/// rendered content without inspecting prior state.
///
/// # Errors
///
/// Returns an error if no backend is available, rendering fails, or the
/// descriptor cannot be written. Nothing is written on a render failure.
pub async fn install(
    cfg: &AgentConfig,
    host: &impl HostSystem,
    fs: &impl LocalFs,
    users: &impl UserDatabase,
    reporter: &impl ProgressReporter,
) -> Result<()> {
    let backend = detect::detect(cfg.os, cfg.is_root, host, fs).await?;
    let descriptor = resolve_descriptor(cfg.os, backend, cfg.is_root, &cfg.home_dir)?;

    let vars = render::build_context(cfg, users)?;
    let content = render::render(descriptor.template, &vars)?;

    reporter.step(&format!("writing {}", descriptor.path.display()));
    match backend {
        Backend::S6 => s6::install(&descriptor, &content, &vars, fs)?,
        _ => write_descriptor(fs, &descriptor.path, &content)?,
    }
    reporter.success("daemon service installed");

    Ok(())
}

/// Enable and launch the daemon under the detected backend.
///
/// # Errors
///
/// Returns an error if no backend is available or any control command fails;
/// command failures carry the captured standard error.
pub async fn start(cfg: &AgentConfig, host: &impl HostSystem, fs: &impl LocalFs) -> Result<()> {
    let backend = detect::detect(cfg.os, cfg.is_root, host, fs).await?;
    let descriptor = resolve_descriptor(cfg.os, backend, cfg.is_root, &cfg.home_dir)?;

    match backend {
        Backend::SystemdUser => systemd::start(host, true).await?,
        Backend::SystemdRoot => systemd::start(host, false).await?,
        Backend::S6 => s6::start(&descriptor, host, fs).await?,
        Backend::Launchd => launchd::start(&descriptor, host).await?,
        Backend::Unavailable => return Err(DaemonError::UnsupportedOs.into()),
    }

    Ok(())
}

/// Stop the daemon under the detected backend.
///
/// # Errors
///
/// Returns an error if no backend is available or the control command fails.
pub async fn stop(cfg: &AgentConfig, host: &impl HostSystem, fs: &impl LocalFs) -> Result<()> {
    let backend = detect::detect(cfg.os, cfg.is_root, host, fs).await?;
    let descriptor = resolve_descriptor(cfg.os, backend, cfg.is_root, &cfg.home_dir)?;

    match backend {
        Backend::SystemdUser => systemd::stop(host, true).await?,
        Backend::SystemdRoot => systemd::stop(host, false).await?,
        Backend::S6 => s6::stop(&descriptor, host, fs).await?,
        Backend::Launchd => launchd::stop(&descriptor, host).await?,
        Backend::Unavailable => return Err(DaemonError::UnsupportedOs.into()),
    }

    Ok(())
}

/// Signal the daemon to reload its configuration.
///
/// launchd has no native reload: it is stopped then started, and a failed
/// stop aborts the reload without attempting the start.
///
/// # Errors
///
/// Returns an error if no backend is available or either half fails.
pub async fn reload(cfg: &AgentConfig, host: &impl HostSystem, fs: &impl LocalFs) -> Result<()> {
    let backend = detect::detect(cfg.os, cfg.is_root, host, fs).await?;
    let descriptor = resolve_descriptor(cfg.os, backend, cfg.is_root, &cfg.home_dir)?;

    match backend {
        Backend::SystemdUser => systemd::reload(host, true).await?,
        Backend::SystemdRoot => systemd::reload(host, false).await?,
        Backend::S6 => s6::reload(&descriptor, host).await?,
        Backend::Launchd => launchd::reload(&descriptor, host).await?,
        Backend::Unavailable => return Err(DaemonError::UnsupportedOs.into()),
    }

    Ok(())
}

/// Remove the service descriptor.
///
/// An already-absent descriptor is a no-op success so uninstall stays
/// idempotent; any other filesystem failure is fatal.
///
/// # Errors
///
/// Returns an error if no backend is available or removal fails for a reason
/// other than the descriptor not existing.
pub async fn destroy(cfg: &AgentConfig, host: &impl HostSystem, fs: &impl LocalFs) -> Result<()> {
    let backend = detect::detect(cfg.os, cfg.is_root, host, fs).await?;
    let descriptor = resolve_descriptor(cfg.os, backend, cfg.is_root, &cfg.home_dir)?;

    match backend {
        Backend::S6 => s6::destroy(&descriptor, fs)?,
        _ => remove_descriptor(fs, &descriptor.path)?,
    }

    Ok(())
}

// ── Shared helpers ───────────────────────────────────────────────────────────

/// Run a control command, mapping spawn failures and non-zero exits to
/// [`DaemonError::CommandFailed`] with captured standard error attached.
pub(crate) async fn run_checked(
    host: &impl CommandRunner,
    op: &'static str,
    program: &str,
    args: &[&str],
) -> Result<(), DaemonError> {
    let command = format!("{program} {}", args.join(" "));
    let output = host
        .run(program, args)
        .await
        .map_err(|e| DaemonError::CommandFailed {
            op,
            command: command.clone(),
            stderr: format!("{e:#}"),
        })?;

    if output.status.success() {
        Ok(())
    } else {
        Err(DaemonError::CommandFailed {
            op,
            command,
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        })
    }
}

pub(crate) fn fs_error(path: &Path, err: anyhow::Error) -> DaemonError {
    DaemonError::Filesystem {
        path: path.to_path_buf(),
        reason: format!("{err:#}"),
    }
}

/// Write a rendered descriptor, creating its parent directory tree first.
pub(crate) fn write_descriptor(
    fs: &impl LocalFs,
    path: &Path,
    content: &[u8],
) -> Result<(), DaemonError> {
    if let Some(parent) = path.parent() {
        fs.create_dir_all(parent, SERVICE_DIR_MODE)
            .map_err(|e| fs_error(parent, e))?;
    }
    fs.write(path, content, SERVICE_FILE_MODE)
        .map_err(|e| fs_error(path, e))
}

fn remove_descriptor(fs: &impl LocalFs, path: &Path) -> Result<(), DaemonError> {
    if !fs.exists(path) {
        return Ok(());
    }
    fs.remove_file(path).map_err(|e| fs_error(path, e))
}
