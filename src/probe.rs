//! Connection test through the system `ssh` client.

use crate::{command_path, log_debug, log_warn};
use std::process::{Command, Stdio};
use std::thread;
use std::time::{Duration, Instant};

const POLL_INTERVAL: Duration = Duration::from_millis(50);

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProbeOutcome {
    Success,
    /// Non-zero exit; `None` when killed by a signal
    Failed(Option<i32>),
    TimedOut,
    SpawnFailed(String),
}

impl ProbeOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, ProbeOutcome::Success)
    }
}

/// Run `ssh <host> echo ok` in batch mode, bounded by `timeout`.
pub fn test_connection(host_name: &str, timeout: Duration) -> ProbeOutcome {
    let ssh = match command_path::ssh_path() {
        Ok(path) => path,
        Err(err) => return ProbeOutcome::SpawnFailed(err.to_string()),
    };

    let mut command = Command::new(ssh);
    command
        .arg("-o")
        .arg(format!("ConnectTimeout={}", timeout.as_secs().max(1)))
        .arg("-o")
        .arg("BatchMode=yes")
        .arg(host_name)
        .arg("echo")
        .arg("ok");

    log_debug!("Testing connection to '{}' (timeout {:?})", host_name, timeout);
    run_bounded(command, timeout)
}

/// Spawn `command` with no stdio and wait for it at most `timeout`. The child
/// is killed when the deadline passes.
pub(crate) fn run_bounded(mut command: Command, timeout: Duration) -> ProbeOutcome {
    command.stdin(Stdio::null()).stdout(Stdio::null()).stderr(Stdio::null());

    let mut child = match command.spawn() {
        Ok(child) => child,
        Err(err) => return ProbeOutcome::SpawnFailed(err.to_string()),
    };

    let deadline = Instant::now() + timeout;
    loop {
        match child.try_wait() {
            Ok(Some(status)) if status.success() => return ProbeOutcome::Success,
            Ok(Some(status)) => return ProbeOutcome::Failed(status.code()),
            Ok(None) if Instant::now() >= deadline => {
                log_warn!("Connection test exceeded {:?}, killing pid {}", timeout, child.id());
                let _ = child.kill();
                let _ = child.wait();
                return ProbeOutcome::TimedOut;
            }
            Ok(None) => thread::sleep(POLL_INTERVAL),
            Err(err) => {
                let _ = child.kill();
                return ProbeOutcome::SpawnFailed(err.to_string());
            }
        }
    }
}

#[cfg(test)]
#[path = "test/probe.rs"]
mod tests;
