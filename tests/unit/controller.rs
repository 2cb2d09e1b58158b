//! Unit tests for the daemon lifecycle controller.

#![allow(clippy::expect_used)]

use std::path::Path;

use oda_cli::application::services::daemon;
use oda_cli::application::ports::LocalFs;
use oda_cli::domain::config::OsType;
use oda_cli::domain::error::DaemonError;

use crate::helpers::{DenyFs, MemFs, NullReporter, ScriptedHost, StaticGroups, agent_config};

// ── Install ───────────────────────────────────────────────────────────────────

#[tokio::test]
async fn install_systemd_root_writes_unit_file() {
    let host = ScriptedHost::new();
    let fs = MemFs::new();
    let cfg = agent_config(OsType::Linux, true);

    daemon::install(&cfg, &host, &fs, &StaticGroups, &NullReporter)
        .await
        .expect("installs");

    let unit = fs
        .read_to_string(Path::new("/etc/systemd/system/oda.service"))
        .expect("unit written");
    assert!(unit.contains("ExecStart=/usr/local/bin/oda collect"));
    assert!(unit.contains("Environment=HOME=/home/dev"));
}

#[tokio::test]
async fn install_twice_produces_byte_identical_descriptor() {
    let host = ScriptedHost::new();
    let fs = MemFs::new();
    let cfg = agent_config(OsType::Linux, true);
    let path = Path::new("/etc/systemd/system/oda.service");

    daemon::install(&cfg, &host, &fs, &StaticGroups, &NullReporter)
        .await
        .expect("first install");
    let first = fs.contents(path).expect("written");

    daemon::install(&cfg, &host, &fs, &StaticGroups, &NullReporter)
        .await
        .expect("second install");
    let second = fs.contents(path).expect("written");

    assert_eq!(first, second);
}

#[tokio::test]
async fn install_s6_writes_run_and_log_scripts() {
    let host = ScriptedHost::with_binaries(&["s6-svscan", "s6-svc"]);
    let fs = MemFs::new();
    let cfg = agent_config(OsType::Linux, false);

    daemon::install(&cfg, &host, &fs, &StaticGroups, &NullReporter)
        .await
        .expect("installs");

    let run = fs
        .read_to_string(Path::new("/home/dev/.s6/service/oda/run"))
        .expect("run written");
    assert!(run.contains("exec /usr/local/bin/oda collect"));

    let log_run = fs
        .read_to_string(Path::new("/home/dev/.s6/service/oda/log/run"))
        .expect("log/run written");
    assert!(log_run.contains("s6-log"));
    assert!(fs.has_dir(Path::new("/home/dev/.s6/service/oda/log")));
}

#[tokio::test]
async fn install_macos_writes_plist() {
    let host = ScriptedHost::new();
    let fs = MemFs::new();
    let cfg = agent_config(OsType::MacOs, false);

    daemon::install(&cfg, &host, &fs, &StaticGroups, &NullReporter)
        .await
        .expect("installs");

    let plist = fs
        .read_to_string(Path::new("/home/dev/Library/LaunchAgents/oda.plist"))
        .expect("plist written");
    assert!(plist.contains("<string>/usr/local/bin/oda</string>"));
    assert!(plist.contains("<string>collect</string>"));
    assert!(!plist.contains("{{"), "unresolved placeholder in plist");
}

#[tokio::test]
async fn install_on_unsupported_os_fails() {
    let cfg = agent_config(OsType::Unsupported, true);
    let err = daemon::install(&cfg, &ScriptedHost::new(), &MemFs::new(), &StaticGroups, &NullReporter)
        .await
        .expect_err("must fail");
    assert!(matches!(
        err.downcast_ref::<DaemonError>(),
        Some(DaemonError::UnsupportedOs)
    ));
}

// ── Start ─────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn start_systemd_user_enables_then_starts() {
    let host = ScriptedHost::new();
    let cfg = agent_config(OsType::Linux, false);

    daemon::start(&cfg, &host, &MemFs::new()).await.expect("starts");

    assert_eq!(
        host.calls(),
        vec![
            "systemctl is-enabled systemd-logind.service",
            "systemctl --user enable oda.service",
            "systemctl --user start oda.service",
        ]
    );
}

#[tokio::test]
async fn start_systemd_root_skips_user_flag() {
    let host = ScriptedHost::new();
    let cfg = agent_config(OsType::Linux, true);

    daemon::start(&cfg, &host, &MemFs::new()).await.expect("starts");

    assert_eq!(
        host.calls(),
        vec![
            "systemctl enable oda.service",
            "systemctl start oda.service",
        ]
    );
}

#[tokio::test]
async fn start_without_session_manager_fails_before_any_control_command() {
    let host =
        ScriptedHost::new().fail_on("systemctl is-enabled systemd-logind.service", "disabled");
    let cfg = agent_config(OsType::Linux, false);

    let err = daemon::start(&cfg, &host, &MemFs::new())
        .await
        .expect_err("must fail");
    assert!(matches!(
        err.downcast_ref::<DaemonError>(),
        Some(DaemonError::SessionManagerUnavailable)
    ));

    let control_commands: Vec<String> = host
        .calls()
        .into_iter()
        .filter(|call| call.contains("enable oda") || call.contains("start oda"))
        .collect();
    assert!(
        control_commands.is_empty(),
        "control commands issued: {control_commands:?}"
    );
}

#[tokio::test]
async fn start_failure_carries_captured_stderr() {
    let host = ScriptedHost::new()
        .fail_on("systemctl --user enable oda.service", "unit not found");
    let cfg = agent_config(OsType::Linux, false);

    let err = daemon::start(&cfg, &host, &MemFs::new())
        .await
        .expect_err("must fail");
    let failure = err.downcast_ref::<DaemonError>().expect("typed error");
    match failure {
        DaemonError::CommandFailed { op, stderr, .. } => {
            assert_eq!(*op, "start");
            assert!(stderr.contains("unit not found"));
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn start_s6_removes_down_file_and_touches_run() {
    let host = ScriptedHost::with_binaries(&["s6-svscan", "s6-svc"]);
    let fs = MemFs::new();
    fs.insert(Path::new("/etc/s6/service/oda/down"), b"");
    let cfg = agent_config(OsType::Linux, true);

    daemon::start(&cfg, &host, &fs).await.expect("starts");

    assert!(!fs.exists(Path::new("/etc/s6/service/oda/down")));
    assert_eq!(host.calls(), vec!["touch /etc/s6/service/oda/run"]);
}

#[tokio::test]
async fn start_s6_falls_back_to_svc_when_touch_fails() {
    let host = ScriptedHost::with_binaries(&["s6-svscan", "s6-svc"])
        .fail_on("touch /etc/s6/service/oda/run", "read-only");
    let cfg = agent_config(OsType::Linux, true);

    daemon::start(&cfg, &host, &MemFs::new()).await.expect("starts");

    assert_eq!(
        host.calls(),
        vec![
            "touch /etc/s6/service/oda/run",
            "s6-svc -u /etc/s6/service/oda",
        ]
    );
}

// ── Stop ──────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn stop_s6_writes_down_sentinel_then_signals() {
    let host = ScriptedHost::with_binaries(&["s6-svscan", "s6-svc"]);
    let fs = MemFs::new();
    let cfg = agent_config(OsType::Linux, true);

    daemon::stop(&cfg, &host, &fs).await.expect("stops");

    assert!(fs.exists(Path::new("/etc/s6/service/oda/down")));
    assert_eq!(host.calls(), vec!["s6-svc -d /etc/s6/service/oda"]);
}

#[tokio::test]
async fn stop_launchd_unloads_plist() {
    let host = ScriptedHost::new();
    let cfg = agent_config(OsType::MacOs, false);

    daemon::stop(&cfg, &host, &MemFs::new()).await.expect("stops");

    assert_eq!(
        host.calls(),
        vec!["launchctl unload -w /home/dev/Library/LaunchAgents/oda.plist"]
    );
}

// ── Reload ────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn reload_systemd_issues_reload() {
    let host = ScriptedHost::new();
    let cfg = agent_config(OsType::Linux, true);

    daemon::reload(&cfg, &host, &MemFs::new()).await.expect("reloads");

    assert_eq!(host.calls(), vec!["systemctl reload oda.service"]);
}

#[tokio::test]
async fn reload_s6_sends_hup() {
    let host = ScriptedHost::with_binaries(&["s6-svscan", "s6-svc"]);
    let cfg = agent_config(OsType::Linux, true);

    daemon::reload(&cfg, &host, &MemFs::new()).await.expect("reloads");

    assert_eq!(host.calls(), vec!["s6-svc -h /etc/s6/service/oda"]);
}

#[tokio::test]
async fn reload_launchd_is_stop_then_start() {
    let host = ScriptedHost::new();
    let cfg = agent_config(OsType::MacOs, false);

    daemon::reload(&cfg, &host, &MemFs::new()).await.expect("reloads");

    assert_eq!(
        host.calls(),
        vec![
            "launchctl unload -w /home/dev/Library/LaunchAgents/oda.plist",
            "launchctl load -w /home/dev/Library/LaunchAgents/oda.plist",
        ]
    );
}

#[tokio::test]
async fn reload_launchd_failed_stop_never_attempts_start() {
    let host = ScriptedHost::new().fail_on(
        "launchctl unload -w /home/dev/Library/LaunchAgents/oda.plist",
        "Could not find service",
    );
    let cfg = agent_config(OsType::MacOs, false);

    let err = daemon::reload(&cfg, &host, &MemFs::new())
        .await
        .expect_err("must fail");
    let failure = err.downcast_ref::<DaemonError>().expect("typed error");
    match failure {
        DaemonError::CommandFailed { op, stderr, .. } => {
            assert_eq!(*op, "stop");
            assert!(stderr.contains("Could not find service"));
        }
        other => panic!("unexpected error: {other:?}"),
    }

    let loads: Vec<String> = host
        .calls()
        .into_iter()
        .filter(|call| call.starts_with("launchctl load"))
        .collect();
    assert!(loads.is_empty(), "start attempted after failed stop: {loads:?}");
}

// ── Destroy ───────────────────────────────────────────────────────────────────

#[tokio::test]
async fn destroy_missing_descriptor_is_success() {
    let cfg = agent_config(OsType::MacOs, false);
    daemon::destroy(&cfg, &ScriptedHost::new(), &MemFs::new())
        .await
        .expect("destroy is idempotent");
}

#[tokio::test]
async fn destroy_removes_existing_descriptor() {
    let fs = MemFs::new();
    let path = Path::new("/etc/systemd/system/oda.service");
    fs.insert(path, b"[Unit]");
    let cfg = agent_config(OsType::Linux, true);

    daemon::destroy(&cfg, &ScriptedHost::new(), &fs)
        .await
        .expect("destroys");
    assert!(!fs.exists(path));
}

#[tokio::test]
async fn destroy_s6_removes_service_directory() {
    let host = ScriptedHost::with_binaries(&["s6-svscan", "s6-svc"]);
    let fs = MemFs::new();
    fs.insert(Path::new("/etc/s6/service/oda/run"), b"#!/bin/sh");
    fs.insert(Path::new("/etc/s6/service/oda/log/run"), b"#!/bin/sh");
    let cfg = agent_config(OsType::Linux, true);

    daemon::destroy(&cfg, &host, &fs).await.expect("destroys");

    assert!(!fs.exists(Path::new("/etc/s6/service/oda/run")));
    assert!(!fs.exists(Path::new("/etc/s6/service/oda/log/run")));
}

#[tokio::test]
async fn destroy_permission_denied_is_a_filesystem_error() {
    let cfg = agent_config(OsType::MacOs, false);
    let err = daemon::destroy(&cfg, &ScriptedHost::new(), &DenyFs)
        .await
        .expect_err("must fail");
    assert!(matches!(
        err.downcast_ref::<DaemonError>(),
        Some(DaemonError::Filesystem { .. })
    ));
}
