//! `oda install` — write the service descriptor for the host's backend.

use anyhow::{Context, Result};
use clap::Args;

use crate::app::AppContext;
use crate::application::services::daemon;
use crate::domain::config::{SUPPORTED_SHELLS, ShellKind};
use crate::infra::host;
use crate::output::OutputContext;

/// Arguments for the install command.
#[derive(Args)]
pub struct InstallArgs {
    /// Shells to instrument (bash, zsh, fish); use `all` for every shell
    #[arg(short = 's', long = "shell", value_name = "SHELL")]
    pub shells: Vec<String>,

    /// Run installation in non-interactive mode
    #[arg(short = 'n', long)]
    pub non_interactive: bool,

    /// Try to automatically generate the credentials
    #[arg(short = 'a', long)]
    pub auto_credentials: bool,

    /// Collection runs inside a managed workspace
    #[arg(short = 'w', long)]
    pub workspace: bool,
}

/// Run `oda install`.
///
/// # Errors
///
/// Returns an error if a shell name is unsupported or the daemon
/// configuration cannot be installed.
pub async fn run(app: &AppContext, args: &InstallArgs) -> Result<()> {
    let shells = resolve_shells(&args.shells, args.non_interactive, &app.output)?;

    let cfg = host::agent_config(args.auto_credentials, args.workspace, &shells, "install")?;

    app.output.info("Installing ODA daemon...");
    daemon::install(&cfg, &app.host, &app.fs, &app.users, &app.reporter())
        .await
        .context("failed to install ODA daemon configuration")?;

    for (shell, rc_path) in &cfg.shell_rc_paths {
        app.output
            .kv(&shell.to_string(), &rc_path.display().to_string());
    }

    app.output.success("ODA daemon installed.");
    app.output.info("Start it with: oda start");
    Ok(())
}

/// Validate `--shell` values, or prompt when running interactively with none
/// given. `all` expands to every supported shell.
fn resolve_shells(
    names: &[String],
    non_interactive: bool,
    ctx: &OutputContext,
) -> Result<Vec<ShellKind>> {
    if names.is_empty() {
        if non_interactive || !ctx.is_tty {
            return Ok(Vec::new());
        }
        let labels: Vec<String> = SUPPORTED_SHELLS.iter().map(ToString::to_string).collect();
        let picked = dialoguer::MultiSelect::new()
            .with_prompt("Shells to instrument")
            .items(&labels)
            .interact()
            .context("shell selection prompt failed")?;
        return Ok(picked.into_iter().map(|i| SUPPORTED_SHELLS[i]).collect());
    }

    if names.iter().any(|name| name.eq_ignore_ascii_case("all")) {
        return Ok(SUPPORTED_SHELLS.to_vec());
    }

    names
        .iter()
        .map(|name| {
            ShellKind::from_name(name).ok_or_else(|| {
                anyhow::anyhow!("unsupported shell: {name} (expected one of: bash, zsh, fish, all)")
            })
        })
        .collect()
}
