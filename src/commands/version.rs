//! `oda version` — show version.

use anyhow::Result;

/// Run `oda version`.
///
/// # Errors
///
/// Infallible; returns `Result` for a uniform command signature.
pub fn run() -> Result<()> {
    println!("oda {}", env!("CARGO_PKG_VERSION"));
    Ok(())
}
