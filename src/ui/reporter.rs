use crate::core::check::CheckError;
use crate::core::poll::{PollOutcome, RoundReporter};
use crate::ui::colors::Colorizer;

/// Prints run narration to stdout/stderr
#[derive(Debug, Clone, Copy)]
pub struct ConsoleReporter {
    colors: Colorizer,
    quiet: bool,
}

impl ConsoleReporter {
    pub fn new(colors: Colorizer, quiet: bool) -> Self {
        Self { colors, quiet }
    }

    /// Line printed after a round that did not bring the target up
    pub fn waiting_line(&self, result: &Result<bool, CheckError>) -> String {
        match result {
            Err(e) => format!("{}: {}", self.colors.waiting("still waiting"), e),
            Ok(_) => format!(
                "{}: {}",
                self.colors.waiting("still waiting"),
                self.colors.down("target is down")
            ),
        }
    }

    /// Final line for an outcome, with whether it belongs on stderr
    ///
    /// Failures are always reported; other lines respect `--quiet`.
    pub fn outcome_line(&self, outcome: &PollOutcome) -> Option<(String, bool)> {
        match outcome {
            PollOutcome::Failed(e) => {
                Some((format!("{}: {}", self.colors.error("check failed"), e), true))
            }
            _ if self.quiet => None,
            PollOutcome::Up => Some((self.colors.up("target is up"), false)),
            PollOutcome::Down => Some((self.colors.down("target is down"), false)),
            PollOutcome::Cancelled => None,
        }
    }

    pub fn report_outcome(&self, outcome: &PollOutcome) {
        match self.outcome_line(outcome) {
            Some((line, true)) => eprintln!("{}", line),
            Some((line, false)) => println!("{}", line),
            None => {}
        }
    }
}

impl RoundReporter for ConsoleReporter {
    fn still_waiting(&self, _round: u64, result: &Result<bool, CheckError>) {
        if !self.quiet {
            println!("{}", self.waiting_line(result));
        }
    }
}
