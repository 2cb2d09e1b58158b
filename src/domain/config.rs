//! Host and invocation configuration for the agent.
//!
//! Pure types only — host introspection and file loading live in
//! `crate::infra`. `AgentConfig` is built once per CLI invocation and never
//! mutated afterwards; there is no process-wide configuration state.

use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

// ── Constants ────────────────────────────────────────────────────────────────

/// The agent's own command name, as typed by operators and as it appears in
/// reconstructed command paths.
pub const AGENT_COMMAND_NAME: &str = "oda";

/// Directory under the home directory holding the database, logs and config.
pub const AGENT_DIR_NAME: &str = ".oda";

/// Name of the optional configuration file inside the agent directory.
pub const CONFIG_FILE_NAME: &str = "config.yaml";

// ── Host facts ───────────────────────────────────────────────────────────────

/// Operating system classification, determined once at process start.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OsType {
    Linux,
    MacOs,
    Unsupported,
}

impl fmt::Display for OsType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Linux => write!(f, "linux"),
            Self::MacOs => write!(f, "macos"),
            Self::Unsupported => write!(f, "unsupported"),
        }
    }
}

/// Shells the installer knows how to instrument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ShellKind {
    Bash,
    Zsh,
    Fish,
}

/// All supported shells, in display order.
pub const SUPPORTED_SHELLS: &[ShellKind] = &[ShellKind::Bash, ShellKind::Zsh, ShellKind::Fish];

impl ShellKind {
    /// Parse a shell name as given on the command line.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "bash" => Some(Self::Bash),
            "zsh" => Some(Self::Zsh),
            "fish" => Some(Self::Fish),
            _ => None,
        }
    }

    /// The rc file this shell sources, relative to the home directory.
    #[must_use]
    pub fn rc_file(self) -> &'static str {
        match self {
            Self::Bash => ".bashrc",
            Self::Zsh => ".zshrc",
            Self::Fish => ".config/fish/config.fish",
        }
    }
}

impl fmt::Display for ShellKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bash => write!(f, "bash"),
            Self::Zsh => write!(f, "zsh"),
            Self::Fish => write!(f, "fish"),
        }
    }
}

/// The non-root identity to impersonate when installing via sudo.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SudoUser {
    pub name: String,
    pub uid: u32,
    pub gid: u32,
}

/// Immutable per-invocation configuration for the daemon controller.
///
/// Owned by the controller for the duration of one operation; rebuilt from
/// host facts on every invocation.
#[derive(Debug, Clone)]
pub struct AgentConfig {
    /// Absolute path of the agent executable.
    pub exe_path: PathBuf,
    /// Home directory the user-mode service files live under.
    pub home_dir: PathBuf,
    pub os: OsType,
    pub is_root: bool,
    /// Set when running under sudo on behalf of a non-root user.
    pub sudo_user: Option<SudoUser>,
    /// Append `-a` to the boot-time collect invocation.
    pub auto_credential: bool,
    /// Append `-w` to the boot-time collect invocation.
    pub workspace: bool,
    /// Shells selected for instrumentation, mapped to their rc files.
    pub shell_rc_paths: BTreeMap<ShellKind, PathBuf>,
    /// Space-separated command path that invoked the current install.
    pub command_path: String,
}

impl AgentConfig {
    /// The agent's own directory (database, logs, config) under home.
    #[must_use]
    pub fn agent_dir(&self) -> PathBuf {
        self.home_dir.join(AGENT_DIR_NAME)
    }
}

// ── Application config file ──────────────────────────────────────────────────

/// Optional settings loaded from `~/.oda/config.yaml`.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub auth: AuthConfig,
    pub collection: CollectionConfig,
    /// Enable debug logging for long-running modes.
    pub debug: bool,
}

/// Telemetry endpoint settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Base URL of the collector service.
    pub address: String,
    /// Per-request timeout, in seconds.
    pub timeout_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            address: "http://localhost:8787".to_string(),
            timeout_secs: 10,
        }
    }
}

/// Credentials attached to every outbound batch.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct AuthConfig {
    pub token: Option<String>,
    pub workspace_id: Option<String>,
}

/// Local collection and retention settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CollectionConfig {
    /// How often collected records are shipped to the server, in seconds.
    pub flush_interval_secs: u64,
    /// Records older than this many days are deleted locally.
    pub retention_days: u32,
    /// How often the retention sweep runs, in hours.
    pub cleanup_interval_hours: u64,
}

impl Default for CollectionConfig {
    fn default() -> Self {
        Self {
            flush_interval_secs: 300,
            retention_days: 5,
            cleanup_interval_hours: 24,
        }
    }
}

// ── Unit tests ───────────────────────────────────────────────────────────────
