//! `oda config` — print current configuration.

use anyhow::Result;

use crate::app::AppContext;
use crate::infra::host;

/// Run `oda config`.
///
/// # Errors
///
/// Returns an error if host facts or the config file cannot be read.
pub fn run(app: &AppContext) -> Result<()> {
    let cfg = host::agent_config(false, false, &[], "config")?;
    let app_cfg = crate::infra::config::load(&cfg.home_dir)?;
    let ctx = &app.output;

    ctx.header("Host");
    ctx.kv("os", &cfg.os.to_string());
    ctx.kv("root", &cfg.is_root.to_string());
    ctx.kv("home", &cfg.home_dir.display().to_string());
    ctx.kv("binary", &cfg.exe_path.display().to_string());
    if let Some(user) = &cfg.sudo_user {
        ctx.kv(
            "sudo user",
            &format!("{} (uid {}, gid {})", user.name, user.uid, user.gid),
        );
    }

    ctx.header("Collector");
    ctx.kv("address", &app_cfg.server.address);
    ctx.kv("timeout", &format!("{}s", app_cfg.server.timeout_secs));

    ctx.header("Collection");
    ctx.kv(
        "flush every",
        &format!("{}s", app_cfg.collection.flush_interval_secs),
    );
    ctx.kv(
        "retention",
        &format!("{} days", app_cfg.collection.retention_days),
    );
    ctx.kv(
        "cleanup every",
        &format!("{}h", app_cfg.collection.cleanup_interval_hours),
    );

    Ok(())
}
