//! Service backends and descriptor resolution.
//!
//! A backend is the host's active service-supervision mechanism. The
//! descriptor is the on-disk service definition it consumes. Resolution is a
//! pure mapping from (OS, backend, privilege, home) to a path and template;
//! it is recomputed on every operation and never cached, since host state can
//! change between runs.

use std::path::{Path, PathBuf};

use crate::domain::config::OsType;
use crate::domain::error::DaemonError;

// ── Constants ────────────────────────────────────────────────────────────────

pub const SERVICE_UNIT_NAME: &str = "oda.service";
pub const SYSTEMD_ROOT_DIR: &str = "/etc/systemd/system";
pub const SYSTEMD_USER_DIR: &str = ".config/systemd/user";

pub const PLIST_NAME: &str = "oda.plist";
pub const PLIST_ROOT_DIR: &str = "/Library/LaunchDaemons";
pub const PLIST_USER_DIR: &str = "Library/LaunchAgents";

pub const S6_ROOT_DIR: &str = "/etc/s6/service";
pub const S6_USER_DIR: &str = ".s6/service";
pub const S6_SERVICE_NAME: &str = "oda";
pub const S6_RUN_FILE: &str = "run";
pub const S6_DOWN_FILE: &str = "down";
pub const S6_LOG_DIR: &str = "log";

/// Permission bits for written service files.
pub const SERVICE_FILE_MODE: u32 = 0o644;
/// Permission bits for created service directories.
pub const SERVICE_DIR_MODE: u32 = 0o755;

// ── Types ────────────────────────────────────────────────────────────────────

/// The host's active service-supervision mechanism.
///
/// Computed per invocation by detection; never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backend {
    SystemdUser,
    SystemdRoot,
    S6,
    Launchd,
    Unavailable,
}

/// Identifier of an embedded service template.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TemplateId {
    SystemdUnit,
    LaunchdPlist,
    S6Run,
    S6LogRun,
}

impl TemplateId {
    /// File name of the embedded template under `assets/services/`.
    #[must_use]
    pub fn asset_name(self) -> &'static str {
        match self {
            Self::SystemdUnit => "oda.service",
            Self::LaunchdPlist => "oda.plist",
            Self::S6Run => "oda.s6.run",
            Self::S6LogRun => "oda.s6.log",
        }
    }
}

/// A resolved service descriptor: where the definition file lives and which
/// template renders it. Ephemeral — recomputed every operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Descriptor {
    pub path: PathBuf,
    pub template: TemplateId,
}

impl Descriptor {
    /// The s6 service directory owning this descriptor (`run`'s parent).
    #[must_use]
    pub fn service_dir(&self) -> PathBuf {
        self.path
            .parent()
            .map_or_else(|| self.path.clone(), Path::to_path_buf)
    }
}

// ── Resolution ───────────────────────────────────────────────────────────────

/// Resolve the service descriptor for one operation.
///
/// Root-mode and user-mode paths are disjoint by construction, so concurrent
/// root and non-root installs never collide on the same file.
///
/// # Errors
///
/// Returns [`DaemonError::UnsupportedOs`] when the OS is unsupported or no
/// backend is available on the host.
pub fn resolve_descriptor(
    os: OsType,
    backend: Backend,
    is_root: bool,
    home_dir: &Path,
) -> Result<Descriptor, DaemonError> {
    if os == OsType::Unsupported {
        return Err(DaemonError::UnsupportedOs);
    }

    let descriptor = match backend {
        Backend::SystemdRoot => Descriptor {
            path: Path::new(SYSTEMD_ROOT_DIR).join(SERVICE_UNIT_NAME),
            template: TemplateId::SystemdUnit,
        },
        Backend::SystemdUser => Descriptor {
            path: home_dir.join(SYSTEMD_USER_DIR).join(SERVICE_UNIT_NAME),
            template: TemplateId::SystemdUnit,
        },
        Backend::S6 => {
            let root = if is_root {
                PathBuf::from(S6_ROOT_DIR)
            } else {
                home_dir.join(S6_USER_DIR)
            };
            Descriptor {
                path: root.join(S6_SERVICE_NAME).join(S6_RUN_FILE),
                template: TemplateId::S6Run,
            }
        }
        Backend::Launchd => {
            let dir = if is_root {
                PathBuf::from(PLIST_ROOT_DIR)
            } else {
                home_dir.join(PLIST_USER_DIR)
            };
            Descriptor {
                path: dir.join(PLIST_NAME),
                template: TemplateId::LaunchdPlist,
            }
        }
        Backend::Unavailable => return Err(DaemonError::UnsupportedOs),
    };

    Ok(descriptor)
}

// ── Unit tests ───────────────────────────────────────────────────────────────
