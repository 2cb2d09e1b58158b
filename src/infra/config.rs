//! Loading of the optional application config file.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::domain::config::{AGENT_DIR_NAME, AppConfig, CONFIG_FILE_NAME};

/// Path of the config file under the given home directory.
#[must_use]
pub fn config_path(home_dir: &Path) -> PathBuf {
    home_dir.join(AGENT_DIR_NAME).join(CONFIG_FILE_NAME)
}

/// Load `~/.oda/config.yaml`, falling back to defaults when absent.
///
/// # Errors
///
/// Returns an error if the file exists but cannot be read or parsed.
pub fn load(home_dir: &Path) -> Result<AppConfig> {
    let path = config_path(home_dir);
    if !path.exists() {
        return Ok(AppConfig::default());
    }
    let content = std::fs::read_to_string(&path)
        .with_context(|| format!("reading config file {}", path.display()))?;
    serde_yaml::from_str(&content)
        .with_context(|| format!("parsing config file {}", path.display()))
}
