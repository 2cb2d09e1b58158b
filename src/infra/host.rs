//! Host introspection and host-system port implementations.
//!
//! Everything the daemon controller needs to know about the machine it runs
//! on is gathered here, once per invocation, into an immutable
//! [`AgentConfig`].

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::application::ports::{BinaryLocator, CommandRunner, UserDatabase};
use crate::domain::config::{AGENT_COMMAND_NAME, AgentConfig, OsType, ShellKind, SudoUser};
use crate::infra::command_runner::TokioCommandRunner;

// ── Host system (runner + locator) ───────────────────────────────────────────

/// Production host system: tokio process execution plus search-path lookup.
#[derive(Default)]
pub struct LocalHost {
    runner: TokioCommandRunner,
}

impl LocalHost {
    #[must_use]
    pub fn new() -> Self {
        Self {
            runner: TokioCommandRunner,
        }
    }
}

impl CommandRunner for LocalHost {
    async fn run(&self, program: &str, args: &[&str]) -> Result<std::process::Output> {
        self.runner.run(program, args).await
    }

    async fn run_with_timeout(
        &self,
        program: &str,
        args: &[&str],
        timeout: std::time::Duration,
    ) -> Result<std::process::Output> {
        self.runner.run_with_timeout(program, args, timeout).await
    }
}

impl BinaryLocator for LocalHost {
    fn locate(&self, name: &str) -> Option<PathBuf> {
        which::which(name).ok()
    }
}

// ── User database ────────────────────────────────────────────────────────────

/// Group lookups backed by the system user database.
pub struct SystemUserDatabase;

impl UserDatabase for SystemUserDatabase {
    #[cfg(unix)]
    fn group_name(&self, gid: u32) -> Result<String> {
        let group = nix::unistd::Group::from_gid(nix::unistd::Gid::from_raw(gid))
            .with_context(|| format!("looking up group {gid}"))?
            .ok_or_else(|| anyhow::anyhow!("no group with gid {gid}"))?;
        Ok(group.name)
    }

    #[cfg(not(unix))]
    fn group_name(&self, gid: u32) -> Result<String> {
        anyhow::bail!("group lookup is not supported on this platform (gid {gid})")
    }
}

// ── Host facts ───────────────────────────────────────────────────────────────

/// Operating system classification for this build.
#[must_use]
pub fn current_os() -> OsType {
    if cfg!(target_os = "linux") {
        OsType::Linux
    } else if cfg!(target_os = "macos") {
        OsType::MacOs
    } else {
        OsType::Unsupported
    }
}

/// Whether the process runs with root privileges.
#[must_use]
pub fn is_root() -> bool {
    #[cfg(unix)]
    {
        nix::unistd::geteuid().is_root()
    }
    #[cfg(not(unix))]
    {
        false
    }
}

/// The non-root identity behind a sudo invocation, when present.
#[must_use]
pub fn sudo_user() -> Option<SudoUser> {
    let name = std::env::var("SUDO_USER").ok()?;
    let uid = std::env::var("SUDO_UID").ok()?.parse().ok()?;
    let gid = std::env::var("SUDO_GID").ok()?.parse().ok()?;
    Some(SudoUser { name, uid, gid })
}

/// Home directory the service files and agent state live under.
///
/// Under sudo this is the impersonated user's home, so root installs on
/// behalf of a user land in that user's directories.
///
/// # Errors
///
/// Returns an error if no home directory can be determined.
pub fn home_dir(sudo_user: Option<&SudoUser>) -> Result<PathBuf> {
    #[cfg(unix)]
    if let Some(user) = sudo_user
        && let Ok(Some(entry)) = nix::unistd::User::from_name(&user.name)
    {
        return Ok(entry.dir);
    }
    #[cfg(not(unix))]
    let _ = sudo_user;

    dirs::home_dir().context("cannot determine home directory")
}

/// The command path for this invocation, in the space-separated form the
/// collect reconstructor consumes: invoking program base name plus the
/// subcommand.
#[must_use]
pub fn command_path(subcommand: &str) -> String {
    let argv0 = std::env::args().next().unwrap_or_default();
    let base = Path::new(&argv0)
        .file_name()
        .map_or_else(
            || AGENT_COMMAND_NAME.to_string(),
            |name| name.to_string_lossy().into_owned(),
        );
    format!("{base} {subcommand}")
}

/// Assemble the immutable per-invocation configuration.
///
/// # Errors
///
/// Returns an error if the executable path or home directory cannot be
/// determined.
pub fn agent_config(
    auto_credential: bool,
    workspace: bool,
    shells: &[ShellKind],
    subcommand: &str,
) -> Result<AgentConfig> {
    let sudo_user = sudo_user();
    let is_root = is_root();
    let home_dir = home_dir(sudo_user.as_ref())?;
    let exe_path = std::env::current_exe().context("cannot determine executable path")?;

    let shell_rc_paths = shells
        .iter()
        .map(|shell| (*shell, home_dir.join(shell.rc_file())))
        .collect();

    Ok(AgentConfig {
        exe_path,
        home_dir,
        os: current_os(),
        is_root,
        sudo_user,
        auto_credential,
        workspace,
        shell_rc_paths,
        command_path: command_path(subcommand),
    })
}
