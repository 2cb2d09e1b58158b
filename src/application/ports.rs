//! Port trait definitions for the application layer.
//!
//! Ports are the interfaces infrastructure must fulfil. This file imports
//! only from `crate::domain` — never from `crate::infra`, `crate::commands`,
//! or `crate::output`. Production implementations live in `crate::infra`;
//! tests provide stubs.

use std::path::{Path, PathBuf};
use std::process::Output;
use std::time::Duration;

use anyhow::Result;
use chrono::{DateTime, Utc};

use crate::domain::telemetry::{AuthContext, CommandRecord, ProcessRecord};

// ── Process execution ────────────────────────────────────────────────────────

/// Abstracts external process execution so infrastructure can be swapped or
/// mocked.
#[allow(async_fn_in_trait)]
pub trait CommandRunner {
    /// Run a program to completion and capture its output.
    ///
    /// No timeout is applied: service-control commands run under an
    /// interactive CLI, and a hang in the underlying service manager hangs
    /// the operation rather than being masked.
    async fn run(&self, program: &str, args: &[&str]) -> Result<Output>;

    /// Run a program with a bounded timeout, killing it when the timeout
    /// fires. Used for read-only host probes that must not wedge detection.
    async fn run_with_timeout(
        &self,
        program: &str,
        args: &[&str],
        timeout: Duration,
    ) -> Result<Output>;
}

/// Abstracts executable lookup on the search path.
pub trait BinaryLocator {
    /// Resolve `name` on the search path, if present.
    fn locate(&self, name: &str) -> Option<PathBuf>;
}

/// Composite trait — anything that can both run commands and resolve
/// executables is a host system.
pub trait HostSystem: CommandRunner + BinaryLocator {}

impl<T> HostSystem for T where T: CommandRunner + BinaryLocator {}

// ── Filesystem ───────────────────────────────────────────────────────────────

/// Abstracts filesystem access so the daemon manager can be tested without
/// touching a real disk.
pub trait LocalFs {
    fn exists(&self, path: &Path) -> bool;

    /// Create a directory tree; created directories get `mode` bits.
    ///
    /// # Errors
    ///
    /// Returns an error if any directory cannot be created.
    fn create_dir_all(&self, path: &Path, mode: u32) -> Result<()>;

    /// Write `content` to `path` with `mode` bits, replacing any existing
    /// file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written.
    fn write(&self, path: &Path, content: &[u8], mode: u32) -> Result<()>;

    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be removed.
    fn remove_file(&self, path: &Path) -> Result<()>;

    /// # Errors
    ///
    /// Returns an error if the directory exists but cannot be removed.
    fn remove_dir_all(&self, path: &Path) -> Result<()>;

    /// # Errors
    ///
    /// Returns an error if the file cannot be read.
    fn read_to_string(&self, path: &Path) -> Result<String>;
}

// ── Host identities ──────────────────────────────────────────────────────────

/// Abstracts user/group database lookups.
pub trait UserDatabase {
    /// Resolve a group name from its numeric gid.
    ///
    /// # Errors
    ///
    /// Returns an error if the gid does not resolve to a named group.
    fn group_name(&self, gid: u32) -> Result<String>;
}

// ── Progress reporting ───────────────────────────────────────────────────────

/// Abstracts progress output so services never depend on the presentation
/// layer. Sync trait — no async needed.
pub trait ProgressReporter {
    fn step(&self, message: &str);
    fn success(&self, message: &str);
    fn warn(&self, message: &str);
}

// ── Telemetry ────────────────────────────────────────────────────────────────

/// Outbound telemetry client contract: two unary calls, each with a bounded
/// timeout derived from configuration. Transport and encoding are opaque.
#[allow(async_fn_in_trait)]
pub trait TelemetrySink {
    /// # Errors
    ///
    /// Returns an error if the batch cannot be delivered.
    async fn send_commands(&self, commands: &[CommandRecord], auth: &AuthContext) -> Result<()>;

    /// # Errors
    ///
    /// Returns an error if the batch cannot be delivered.
    async fn send_processes(&self, processes: &[ProcessRecord], auth: &AuthContext) -> Result<()>;
}

// ── Retention store ──────────────────────────────────────────────────────────

/// Local store of collected records, with age-based cleanup.
pub trait RetentionStore {
    /// # Errors
    ///
    /// Returns an error if the store cannot be queried.
    fn commands_since(&self, since: DateTime<Utc>) -> Result<Vec<CommandRecord>>;

    /// # Errors
    ///
    /// Returns an error if the store cannot be queried.
    fn processes_since(&self, since: DateTime<Utc>) -> Result<Vec<ProcessRecord>>;

    /// Delete commands older than `days`; returns the number removed.
    ///
    /// # Errors
    ///
    /// Returns an error if the deletion fails.
    fn delete_commands_older_than(&self, days: u32) -> Result<usize>;

    /// Delete process samples older than `days`; returns the number removed.
    ///
    /// # Errors
    ///
    /// Returns an error if the deletion fails.
    fn delete_processes_older_than(&self, days: u32) -> Result<usize>;
}
