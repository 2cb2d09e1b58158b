//! Application context — unified state passed to every command handler.
//!
//! Constructed once in `Cli::run()`; adding a cross-cutting concern requires
//! one field change here, no command signature changes.

use crate::infra::fs::RealFs;
use crate::infra::host::{LocalHost, SystemUserDatabase};
use crate::output::OutputContext;
use crate::output::reporter::TerminalReporter;

/// Unified application context passed to every command handler.
pub struct AppContext {
    /// Terminal output context (colors, quiet mode).
    pub output: OutputContext,
    /// Host system: process execution plus executable lookup.
    pub host: LocalHost,
    /// Real-disk filesystem.
    pub fs: RealFs,
    /// System user/group database.
    pub users: SystemUserDatabase,
    /// Enable debug logging for long-running modes.
    pub verbose: bool,
}

impl AppContext {
    /// Construct an `AppContext` from top-level CLI flags.
    #[must_use]
    pub fn new(no_color: bool, quiet: bool, verbose: bool) -> Self {
        Self {
            output: OutputContext::new(no_color, quiet),
            host: LocalHost::new(),
            fs: RealFs,
            users: SystemUserDatabase,
            verbose,
        }
    }

    /// Progress reporter wired to this context's terminal output.
    #[must_use]
    pub fn reporter(&self) -> TerminalReporter<'_> {
        TerminalReporter::new(&self.output)
    }
}

/// Initialize tracing for long-running modes (`collect`, `serve`).
///
/// `RUST_LOG` wins when set; otherwise `debug` with `--verbose` (or the
/// config file's debug flag), `info` without.
pub fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}
