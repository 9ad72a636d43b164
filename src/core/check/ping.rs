//! ICMP checks through the platform `ping` utility
//!
//! Raw ICMP sockets need elevated privileges on most systems, so a check
//! runs the system `ping` binary once and only looks at its exit status.

use crate::core::check::types::CheckError;
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;

/// Name of the ping binary looked up on `PATH`
pub const PING_PROGRAM: &str = "ping";

/// Platform families with distinct ping flag conventions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PingPlatform {
    /// `-n <count> -w <milliseconds>`
    Windows,
    /// `-c <count> -W <seconds>`
    MacOs,
    /// `-c <count> -W <seconds>`
    Unix,
}

impl PingPlatform {
    /// Platform family of the running binary
    pub fn current() -> Self {
        if cfg!(target_os = "windows") {
            PingPlatform::Windows
        } else if cfg!(target_os = "macos") {
            PingPlatform::MacOs
        } else {
            PingPlatform::Unix
        }
    }
}

/// How a ping process ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PingExit {
    /// Exit code 0: an echo reply came back
    Reachable,
    /// Normal termination with a non-zero code: no reply
    Unreachable(i32),
    /// Killed by a signal or otherwise ended without an exit code
    Abnormal,
}

/// Build the ping argument list for one echo request on the current platform
pub fn build_ping_args(target: &str, timeout: Duration) -> Result<Vec<String>, CheckError> {
    build_ping_args_for(PingPlatform::current(), target, timeout)
}

/// Build the ping argument list for one echo request on `platform`
///
/// # Examples
/// - Windows, 3s → `["-n", "1", "-w", "3000", target]`
/// - macOS/Unix, 2.5s → `["-c", "1", "-W", "2", target]`
/// - macOS/Unix, 200ms → `["-c", "1", "-W", "1", target]`
pub fn build_ping_args_for(
    platform: PingPlatform,
    target: &str,
    timeout: Duration,
) -> Result<Vec<String>, CheckError> {
    if target.trim().is_empty() {
        return Err(CheckError::InvalidTarget);
    }

    let args = match platform {
        PingPlatform::Windows => {
            let mut timeout_ms = timeout.as_millis();
            if timeout_ms == 0 {
                timeout_ms = 1000;
            }
            vec![
                "-n".to_string(),
                "1".to_string(),
                "-w".to_string(),
                timeout_ms.to_string(),
                target.to_string(),
            ]
        }
        PingPlatform::MacOs | PingPlatform::Unix => {
            let timeout_secs = timeout.as_secs().max(1);
            vec![
                "-c".to_string(),
                "1".to_string(),
                "-W".to_string(),
                timeout_secs.to_string(),
                target.to_string(),
            ]
        }
    };

    Ok(args)
}

/// Subprocess abstraction for dependency injection and testing
///
/// Implementations must stop the process when the returned future is
/// dropped, which is how cancellation reaches a running ping.
#[async_trait::async_trait]
pub trait PingRunner: Send + Sync {
    /// Run `program` with `args`, discarding all output
    ///
    /// # Returns
    /// * `Ok(PingExit)` - The process ran and terminated
    /// * `Err(CheckError::Subprocess)` - The process could not be started or waited on
    async fn run(&self, program: &str, args: &[String]) -> Result<PingExit, CheckError>;
}

/// Production runner spawning the process through tokio
#[derive(Debug, Default)]
pub struct SystemPingRunner;

#[async_trait::async_trait]
impl PingRunner for SystemPingRunner {
    async fn run(&self, program: &str, args: &[String]) -> Result<PingExit, CheckError> {
        let status = Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .kill_on_drop(true)
            .status()
            .await
            .map_err(|e| CheckError::Subprocess(format!("{}: {}", program, e)))?;

        Ok(match status.code() {
            Some(0) => PingExit::Reachable,
            Some(code) => PingExit::Unreachable(code),
            None => PingExit::Abnormal,
        })
    }
}
