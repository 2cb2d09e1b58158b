//! systemd backend: `systemctl [--user] {enable|start|stop|reload}`.

use crate::application::ports::CommandRunner;
use crate::application::services::daemon::run_checked;
use crate::domain::backend::SERVICE_UNIT_NAME;
use crate::domain::error::DaemonError;

fn unit_args(user_mode: bool, action: &'static str) -> Vec<&'static str> {
    if user_mode {
        vec!["--user", action, SERVICE_UNIT_NAME]
    } else {
        vec![action, SERVICE_UNIT_NAME]
    }
}

/// Enable the unit, then start it. Either command failing fails the whole
/// operation with its captured standard error.
pub(super) async fn start(host: &impl CommandRunner, user_mode: bool) -> Result<(), DaemonError> {
    run_checked(host, "start", "systemctl", &unit_args(user_mode, "enable")).await?;
    run_checked(host, "start", "systemctl", &unit_args(user_mode, "start")).await
}

pub(super) async fn stop(host: &impl CommandRunner, user_mode: bool) -> Result<(), DaemonError> {
    run_checked(host, "stop", "systemctl", &unit_args(user_mode, "stop")).await
}

pub(super) async fn reload(host: &impl CommandRunner, user_mode: bool) -> Result<(), DaemonError> {
    run_checked(host, "reload", "systemctl", &unit_args(user_mode, "reload")).await
}
