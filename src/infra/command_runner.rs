//! Production `CommandRunner` — tokio process execution.
//!
//! `run` waits for the child without a timeout: service-control commands run
//! under an interactive CLI and a hang in the underlying service manager is
//! surfaced to the operator, not masked. `run_with_timeout` kills the child
//! when the deadline fires and is used for detection probes.

use std::process::{Output, Stdio};
use std::time::Duration;

use anyhow::{Context, Result};
use tokio::io::AsyncReadExt;

use crate::application::ports::CommandRunner;

#[derive(Default)]
pub struct TokioCommandRunner;

impl CommandRunner for TokioCommandRunner {
    async fn run(&self, program: &str, args: &[&str]) -> Result<Output> {
        let mut child = spawn_piped(program, args)?;
        collect_output(program, &mut child).await
    }

    async fn run_with_timeout(
        &self,
        program: &str,
        args: &[&str],
        timeout: Duration,
    ) -> Result<Output> {
        let mut child = spawn_piped(program, args)?;

        tokio::select! {
            result = collect_output(program, &mut child) => result,
            () = tokio::time::sleep(timeout) => {
                let _ = child.kill().await;
                anyhow::bail!("{program} timed out after {}s", timeout.as_secs())
            }
        }
    }
}

fn spawn_piped(program: &str, args: &[&str]) -> Result<tokio::process::Child> {
    tokio::process::Command::new(program)
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true)
        .spawn()
        .with_context(|| format!("failed to spawn {program}"))
}

/// Read stdout/stderr CONCURRENTLY with wait() to avoid pipe deadlock.
/// If the child writes more than the OS pipe buffer, it blocks on write;
/// waiting first would then never resolve.
async fn collect_output(program: &str, child: &mut tokio::process::Child) -> Result<Output> {
    let mut stdout_handle = child.stdout.take();
    let mut stderr_handle = child.stderr.take();

    let (status, stdout, stderr) = tokio::join!(
        child.wait(),
        async {
            let mut buf = Vec::new();
            if let Some(ref mut h) = stdout_handle {
                let _ = h.read_to_end(&mut buf).await;
            }
            buf
        },
        async {
            let mut buf = Vec::new();
            if let Some(ref mut h) = stderr_handle {
                let _ = h.read_to_end(&mut buf).await;
            }
            buf
        },
    );

    Ok(Output {
        status: status.with_context(|| format!("waiting for {program}"))?,
        stdout,
        stderr,
    })
}
