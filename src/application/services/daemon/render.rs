//! Service template rendering.
//!
//! Templates are embedded text resources using `{{variable}}` substitution.
//! The variable set is derived from configuration once per install; a
//! placeholder left unresolved after substitution aborts the operation before
//! any file is written. Rendering identical configuration twice is
//! byte-identical.

use std::collections::BTreeMap;

use crate::application::ports::UserDatabase;
use crate::domain::backend::TemplateId;
use crate::domain::collect::{collect_invocation, command_line, exe_base_name};
use crate::domain::config::AgentConfig;
use crate::domain::error::DaemonError;

/// Template variables for one install operation.
pub type RenderContext = BTreeMap<&'static str, String>;

/// Build the render context from configuration.
///
/// # Errors
///
/// Returns an error if the impersonated group name cannot be resolved from
/// the impersonated gid.
pub fn build_context(
    cfg: &AgentConfig,
    users: &impl UserDatabase,
) -> Result<RenderContext, DaemonError> {
    let exe_name = exe_base_name(&cfg.exe_path);
    let args = collect_invocation(&cfg.command_path, &exe_name, cfg.auto_credential, cfg.workspace);

    let mut vars = RenderContext::new();
    vars.insert("binary_path", cfg.exe_path.display().to_string());
    vars.insert("home_dir", cfg.home_dir.display().to_string());
    vars.insert("collect_command", command_line(&args));
    vars.insert("collect_arguments", plist_argument_lines(&args));

    let mut username = String::new();
    let mut group = String::new();
    if let Some(user) = &cfg.sudo_user {
        username = user.name.clone();
        group = users
            .group_name(user.gid)
            .map_err(|e| DaemonError::Template {
                template: "context",
                reason: format!("cannot resolve group for gid {}: {e}", user.gid),
            })?;
    }
    vars.insert("user_directives", user_directives(&username, &group));
    vars.insert("username", username);
    vars.insert("group", group);

    Ok(vars)
}

/// Render an embedded template against the context.
///
/// # Errors
///
/// Returns [`DaemonError::Template`] when the template is missing or a
/// placeholder has no matching variable.
pub fn render(template: TemplateId, vars: &RenderContext) -> Result<Vec<u8>, DaemonError> {
    let name = template.asset_name();
    let source = crate::assets::service_template(name).map_err(|e| DaemonError::Template {
        template: name,
        reason: e.to_string(),
    })?;

    let mut rendered = source.to_string();
    for (key, value) in vars {
        rendered = rendered.replace(&format!("{{{{{key}}}}}"), value);
    }

    if let Some(start) = rendered.find("{{") {
        let tail = &rendered[start..];
        let placeholder = tail
            .find("}}")
            .map_or(tail, |end| &tail[..end + 2]);
        return Err(DaemonError::Template {
            template: name,
            reason: format!("unresolved variable {placeholder}"),
        });
    }

    Ok(rendered.into_bytes())
}

/// Lines of the launchd `ProgramArguments` array, one `<string>` per token.
fn plist_argument_lines(args: &[String]) -> String {
    args.iter()
        .map(|arg| format!("        <string>{arg}</string>"))
        .collect::<Vec<_>>()
        .join("\n")
}

/// `User=`/`Group=` unit directives for impersonated installs; empty when
/// no impersonation applies.
fn user_directives(username: &str, group: &str) -> String {
    if username.is_empty() {
        String::new()
    } else {
        format!("User={username}\nGroup={group}\n")
    }
}

// ── Unit tests ───────────────────────────────────────────────────────────────
