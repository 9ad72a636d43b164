pub mod check;
pub mod debug_logger;
pub mod poll;

pub use check::{Checker, CheckError, CheckMode, CheckOptions};
pub use poll::{PollOutcome, PollSettings, Poller, RoundReporter};
