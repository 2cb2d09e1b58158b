//! CLI argument parsing with clap derive.

use anyhow::Result;
use clap::{Parser, Subcommand};

use crate::app::AppContext;
use crate::commands;

/// Developer activity agent for the ODA project.
#[derive(Parser)]
#[command(
    name = "oda",
    version,
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    /// Suppress non-error output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true, env = "NO_COLOR")]
    pub no_color: bool,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Install the daemon service for the host's service manager
    Install(commands::install::InstallArgs),

    /// Remove the daemon service
    Uninstall,

    /// Enable and start the daemon service
    Start,

    /// Stop the daemon service
    Stop,

    /// Signal the daemon to reload its configuration
    Reload,

    /// Run the collection agent in the foreground
    Collect(commands::collect::CollectArgs),

    /// Print current configuration
    Config,

    /// Show version
    Version,

    /// Serve the local status page
    Serve(commands::serve::ServeArgs),
}

impl Cli {
    /// Execute the CLI command.
    ///
    /// # Errors
    ///
    /// Returns an error if the command fails.
    pub async fn run(self) -> Result<()> {
        let Cli {
            quiet,
            no_color,
            verbose,
            command,
        } = self;
        let app = AppContext::new(no_color, quiet, verbose);

        match command {
            Command::Install(args) => commands::install::run(&app, &args).await,
            Command::Uninstall => commands::uninstall::run(&app).await,
            Command::Start => commands::start::run(&app).await,
            Command::Stop => commands::stop::run(&app).await,
            Command::Reload => commands::reload::run(&app).await,
            Command::Collect(args) => commands::collect::run(&app, &args).await,
            Command::Config => commands::config::run(&app),
            Command::Version => commands::version::run(),
            Command::Serve(args) => commands::serve::run(&app, &args).await,
        }
    }
}
