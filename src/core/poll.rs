/*!
Polling driver for repeated reachability checks.

Drives `Checker::check_with_retries` either once or on a fixed wall-clock
interval until the target is up or the run is cancelled. The driver decides
*when* the run ends; printing and the beep belong to the caller, which is told
about each unsuccessful round through a [`RoundReporter`].

## Outcomes

- **Up**: a round reported the target up (exit 0)
- **Down**: once mode, every attempt cleanly reported down (exit 1)
- **Failed**: once mode, the last attempt errored (exit 1)
- **Cancelled**: interrupt or termination signal (exit 130)
*/

use crate::core::check::{CheckError, Checker};
use std::time::Duration;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;

pub const EXIT_SUCCESS: i32 = 0;
pub const EXIT_FAILURE: i32 = 1;
pub const EXIT_USAGE: i32 = 2;
pub const EXIT_CANCELLED: i32 = 130;

/// Final result of a polling run
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PollOutcome {
    Up,
    Down,
    Failed(CheckError),
    Cancelled,
}

impl PollOutcome {
    /// Process exit code for this outcome
    pub fn exit_code(&self) -> i32 {
        match self {
            PollOutcome::Up => EXIT_SUCCESS,
            PollOutcome::Down | PollOutcome::Failed(_) => EXIT_FAILURE,
            PollOutcome::Cancelled => EXIT_CANCELLED,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PollOutcome::Up => "up",
            PollOutcome::Down => "down",
            PollOutcome::Failed(_) => "failed",
            PollOutcome::Cancelled => "cancelled",
        }
    }
}

/// Receives the result of each round that did not end the run
pub trait RoundReporter {
    /// `result` is `Ok(false)` for a clean "down" or the round's error
    fn still_waiting(&self, round: u64, result: &Result<bool, CheckError>);
}

/// Reporter that ignores every round
#[derive(Debug, Default)]
pub struct SilentReporter;

impl RoundReporter for SilentReporter {
    fn still_waiting(&self, _round: u64, _result: &Result<bool, CheckError>) {}
}

/// Polling schedule for one run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollSettings {
    /// Wait between the starts of successive rounds
    pub interval: Duration,
    /// Extra attempts per round
    pub retries: u32,
    /// Run a single round without an interval loop
    pub once: bool,
}

/// Polling driver bound to one schedule
#[derive(Debug, Clone)]
pub struct Poller {
    settings: PollSettings,
}

impl Poller {
    pub fn new(settings: PollSettings) -> Self {
        Self { settings }
    }

    pub fn settings(&self) -> &PollSettings {
        &self.settings
    }

    /// Run until the target is up, the single round ends, or `cancel` fires
    pub async fn run(
        &self,
        checker: &Checker,
        cancel: &CancellationToken,
        reporter: &dyn RoundReporter,
    ) -> PollOutcome {
        let outcome = if self.settings.once {
            self.run_once(checker, cancel).await
        } else {
            self.run_interval(checker, cancel, reporter).await
        };

        checker
            .logger()
            .run_outcome(outcome.as_str(), outcome.exit_code());
        outcome
    }

    async fn run_once(&self, checker: &Checker, cancel: &CancellationToken) -> PollOutcome {
        let result = checker.check_with_retries(cancel, self.settings.retries).await;
        checker
            .logger()
            .round_complete(1, matches!(result, Ok(true)), error_text(&result).as_deref());

        match result {
            Ok(true) => PollOutcome::Up,
            Ok(false) => PollOutcome::Down,
            Err(CheckError::Cancelled) => PollOutcome::Cancelled,
            Err(e) => PollOutcome::Failed(e),
        }
    }

    async fn run_interval(
        &self,
        checker: &Checker,
        cancel: &CancellationToken,
        reporter: &dyn RoundReporter,
    ) -> PollOutcome {
        let mut ticker = tokio::time::interval(self.settings.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        // The first tick completes immediately; consume it so the first wait is a full interval
        ticker.tick().await;

        let mut round: u64 = 0;
        loop {
            round += 1;
            let result = checker.check_with_retries(cancel, self.settings.retries).await;
            checker
                .logger()
                .round_complete(round, matches!(result, Ok(true)), error_text(&result).as_deref());

            match result {
                Ok(true) => return PollOutcome::Up,
                Err(CheckError::Cancelled) => return PollOutcome::Cancelled,
                _ => reporter.still_waiting(round, &result),
            }

            tokio::select! {
                biased;
                _ = cancel.cancelled() => return PollOutcome::Cancelled,
                _ = ticker.tick() => {}
            }
        }
    }
}

fn error_text(result: &Result<bool, CheckError>) -> Option<String> {
    result.as_ref().err().map(|e| e.to_string())
}
