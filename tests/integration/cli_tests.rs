//! End-to-end tests of the `oda` binary surface.
//!
//! Only commands that never touch host service managers run here; lifecycle
//! behaviour is covered by the unit suite against stubbed ports.

#![allow(clippy::expect_used)]

use assert_cmd::Command;
use predicates::prelude::*;

fn oda() -> Command {
    Command::cargo_bin("oda").expect("binary builds")
}

#[test]
fn version_prints_package_version() {
    oda()
        .arg("version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn help_lists_lifecycle_subcommands() {
    let assert = oda().arg("--help").assert().success();
    let stdout = String::from_utf8_lossy(&assert.get_output().stdout).to_string();
    for subcommand in ["install", "uninstall", "start", "stop", "reload", "collect", "serve"] {
        assert!(
            stdout.contains(subcommand),
            "help does not mention {subcommand}"
        );
    }
}

#[test]
fn no_arguments_shows_help_and_fails() {
    oda().assert().failure();
}

#[test]
fn install_rejects_unknown_shell_before_touching_the_host() {
    oda()
        .args(["install", "--shell", "tcsh", "--non-interactive"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unsupported shell"));
}

#[test]
fn install_help_documents_flags() {
    oda()
        .args(["install", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--auto-credentials"))
        .stdout(predicate::str::contains("--non-interactive"))
        .stdout(predicate::str::contains("--workspace"));
}
