//! Typed errors for daemon lifecycle operations.
//!
//! All variants implement `thiserror::Error` and convert to `anyhow::Error`
//! via the `?` operator. Layers add operation/backend context with
//! `anyhow::Context` instead of recovering; only destroy's "already absent"
//! case is absorbed into success at the call site.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised by the daemon lifecycle manager.
#[derive(Debug, Error)]
pub enum DaemonError {
    /// The host OS has no supported service backend. Terminal.
    #[error("unsupported operating system")]
    UnsupportedOs,

    /// User-mode systemd was requested but the session manager is masked,
    /// disabled or unreachable. Recoverable by re-running as root.
    #[error(
        "session manager (systemd-logind) is not available; \
         re-run as root or enable the logind service"
    )]
    SessionManagerUnavailable,

    /// Template parse/render failure. Nothing is written.
    #[error("failed to render service template {template}: {reason}")]
    Template {
        template: &'static str,
        reason: String,
    },

    /// Filesystem failure distinct from a benign not-exists during destroy.
    #[error("filesystem operation failed on {path}: {reason}")]
    Filesystem { path: PathBuf, reason: String },

    /// An invoked OS control command exited non-zero (or failed to run),
    /// with its captured standard error attached.
    #[error("{op} failed running `{command}`: {stderr}")]
    CommandFailed {
        op: &'static str,
        command: String,
        stderr: String,
    },
}
