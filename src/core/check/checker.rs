//! Target Reachability Checker
//!
//! Runs single checks and retry rounds against one resolved target:
//! - HTTP/HTTPS: GET through a reusable probe client
//! - ICMP: one `ping` subprocess per attempt
//! - Every await point honours the run's cancellation token

use crate::core::check::client::{HttpProbeClient, IsahcProbeClient};
use crate::core::check::ping::{build_ping_args, PingExit, PingRunner, SystemPingRunner, PING_PROGRAM};
use crate::core::check::types::{CheckError, CheckMode, CheckOptions, RETRY_DELAY};
use crate::core::debug_logger::{get_debug_logger, DebugLogger};
use std::future::Future;
use std::time::Instant;
use tokio_util::sync::CancellationToken;

/// Checker for a single target, created once per run
pub struct Checker {
    options: CheckOptions,
    http_client: Box<dyn HttpProbeClient>,
    ping_runner: Box<dyn PingRunner>,
    logger: DebugLogger,
}

impl Checker {
    /// Create a checker with the production HTTP client and ping runner
    ///
    /// # Errors
    ///
    /// Returns `CheckError::InvalidTimeout` for a zero timeout.
    /// Returns `CheckError::ClientBuild` if the HTTP client cannot be created.
    pub fn new(options: CheckOptions) -> Result<Self, CheckError> {
        if options.timeout.is_zero() {
            return Err(CheckError::InvalidTimeout);
        }
        let http_client = IsahcProbeClient::new(options.timeout)?;

        Ok(Self {
            options,
            http_client: Box::new(http_client),
            ping_runner: Box::new(SystemPingRunner),
            logger: get_debug_logger(),
        })
    }

    /// Configure Checker with custom HTTP client (for testing)
    pub fn with_http_client(mut self, client: Box<dyn HttpProbeClient>) -> Self {
        self.http_client = client;
        self
    }

    /// Configure Checker with custom ping runner (for testing)
    pub fn with_ping_runner(mut self, runner: Box<dyn PingRunner>) -> Self {
        self.ping_runner = runner;
        self
    }

    /// Configure Checker with a specific debug logger
    pub fn with_logger(mut self, logger: DebugLogger) -> Self {
        self.logger = logger;
        self
    }

    pub fn options(&self) -> &CheckOptions {
        &self.options
    }

    pub fn logger(&self) -> &DebugLogger {
        &self.logger
    }

    /// Run up to `retries + 1` attempts, 150ms apart
    ///
    /// # Returns
    ///
    /// * `Ok(true)` as soon as one attempt reports the target up
    /// * `Ok(false)` when every attempt cleanly reported it down
    /// * `Err(e)` with the last attempt error when attempts are exhausted
    /// * `Err(CheckError::Cancelled)` immediately on cancellation, including
    ///   during the wait between attempts
    pub async fn check_with_retries(
        &self,
        cancel: &CancellationToken,
        retries: u32,
    ) -> Result<bool, CheckError> {
        let attempts = retries.saturating_add(1);
        let mut last_error = None;

        for attempt in 0..attempts {
            match self.check_once(cancel).await {
                Ok(true) => return Ok(true),
                Ok(false) => {}
                Err(CheckError::Cancelled) => return Err(CheckError::Cancelled),
                Err(e) => last_error = Some(e),
            }

            if attempt + 1 < attempts {
                self.logger
                    .retry_wait(attempt + 1, attempts, RETRY_DELAY.as_millis() as u64);
                tokio::select! {
                    biased;
                    _ = cancel.cancelled() => return Err(CheckError::Cancelled),
                    _ = tokio::time::sleep(RETRY_DELAY) => {}
                }
            }
        }

        match last_error {
            Some(e) => Err(e),
            None => Ok(false),
        }
    }

    /// Run one check in the configured mode
    pub async fn check_once(&self, cancel: &CancellationToken) -> Result<bool, CheckError> {
        let start = Instant::now();
        self.logger.check_start(
            self.options.mode.as_str(),
            &self.options.target,
            self.options.timeout.as_millis() as u64,
        );

        let result = match self.options.mode {
            CheckMode::Icmp => with_cancel(cancel, self.check_icmp()).await,
            CheckMode::Http | CheckMode::Https => with_cancel(cancel, self.check_http()).await,
        };

        let error = result.as_ref().err().map(|e| e.to_string());
        self.logger.check_end(
            self.options.mode.as_str(),
            matches!(result, Ok(true)),
            start.elapsed().as_millis() as u64,
            error.as_deref(),
        );

        result
    }

    async fn check_http(&self) -> Result<bool, CheckError> {
        let status_code = self.http_client.get_status(&self.options.target).await?;
        Ok(self.options.is_success_status(status_code))
    }

    async fn check_icmp(&self) -> Result<bool, CheckError> {
        let args = build_ping_args(&self.options.target, self.options.timeout)?;

        match self.ping_runner.run(PING_PROGRAM, &args).await? {
            PingExit::Reachable => Ok(true),
            PingExit::Unreachable(_) => Ok(false),
            PingExit::Abnormal => Err(CheckError::Subprocess(
                "ping terminated without an exit code".to_string(),
            )),
        }
    }
}

/// Race `fut` against cancellation; the losing future is dropped, which
/// aborts an in-flight request or kills a running child
async fn with_cancel<F>(cancel: &CancellationToken, fut: F) -> Result<bool, CheckError>
where
    F: Future<Output = Result<bool, CheckError>>,
{
    tokio::select! {
        biased;
        _ = cancel.cancelled() => Err(CheckError::Cancelled),
        result = fut => result,
    }
}
