//! Embedded assets — service templates and the status page, compiled into
//! the binary with `include_dir!`.

use anyhow::Result;
use include_dir::{Dir, include_dir};

static EMBEDDED_ASSETS: Dir<'_> = include_dir!("$CARGO_MANIFEST_DIR/assets");

/// A service template by file name (under `assets/services/`).
///
/// # Errors
///
/// Returns an error if no template with the given name exists or it is not
/// valid UTF-8.
pub fn service_template(name: &str) -> Result<&'static str> {
    let path = format!("services/{name}");
    EMBEDDED_ASSETS
        .get_file(&path)
        .ok_or_else(|| anyhow::anyhow!("embedded template not found: {name}"))?
        .contents_utf8()
        .ok_or_else(|| anyhow::anyhow!("embedded template is not UTF-8: {name}"))
}

/// A web asset by file name (under `assets/web/`).
///
/// # Errors
///
/// Returns an error if no asset with the given name exists.
pub fn web_asset(name: &str) -> Result<&'static [u8]> {
    let path = format!("web/{name}");
    EMBEDDED_ASSETS
        .get_file(&path)
        .map(|file| file.contents())
        .ok_or_else(|| anyhow::anyhow!("embedded asset not found: {name}"))
}
