//! Boot-time collect command reconstruction.
//!
//! The binary may be invoked through wrapper scripts or aliases, so the
//! literal argv of the install command cannot be trusted verbatim as the
//! boot-time command. This rebuilds the argument list the agent must be
//! launched with: an optional invocation prefix, the `collect` subcommand,
//! and the configured flags.

use std::path::Path;

use crate::domain::config::AGENT_COMMAND_NAME;

/// Subcommand the background agent runs at boot.
pub const COLLECT_SUBCOMMAND: &str = "collect";
/// Flag appended when credentials are generated automatically.
pub const AUTO_CREDENTIAL_FLAG: &str = "-a";
/// Flag appended when collection runs inside a workspace.
pub const WORKSPACE_FLAG: &str = "-w";

/// Reconstruct the boot-time argument list from the command path that
/// invoked installation.
///
/// `command_path` is the space-separated command path (e.g. `"oda install"`),
/// `exe_name` the base name of the agent executable. Tokens up to and
/// including the agent's own command name are wrapper noise and are dropped;
/// a leading token repeating the executable's file name is stripped first.
/// Tokens of an invocation that never names the agent are kept as a prefix so
/// the boot command routes through the same wrapper.
#[must_use]
pub fn collect_invocation(
    command_path: &str,
    exe_name: &str,
    auto_credential: bool,
    workspace: bool,
) -> Vec<String> {
    let tokens: Vec<&str> = command_path.split_whitespace().collect();

    let mut args: Vec<String> = Vec::new();
    if tokens.first().is_some_and(|first| *first != AGENT_COMMAND_NAME) {
        let mut rest = tokens.as_slice();
        if rest.first().is_some_and(|first| *first == exe_name) {
            rest = &rest[1..];
        }
        for token in rest {
            args.push((*token).to_string());
            if *token == AGENT_COMMAND_NAME {
                args.clear();
                break;
            }
        }
    }

    args.push(COLLECT_SUBCOMMAND.to_string());
    if auto_credential {
        args.push(AUTO_CREDENTIAL_FLAG.to_string());
    }
    if workspace {
        args.push(WORKSPACE_FLAG.to_string());
    }
    args
}

/// Join a reconstructed argument list into the single-string form used by
/// shell-style templates.
#[must_use]
pub fn command_line(args: &[String]) -> String {
    args.join(" ")
}

/// Base name of an executable path, for comparison against command tokens.
#[must_use]
pub fn exe_base_name(exe_path: &Path) -> String {
    exe_path
        .file_name()
        .map_or_else(String::new, |name| name.to_string_lossy().into_owned())
}

// ── Unit tests ───────────────────────────────────────────────────────────────
