// Core types for target reachability checks
use std::collections::BTreeSet;
use std::fmt;
use std::time::Duration;

/// Maximum number of redirects followed by the HTTP probe before failing
pub const MAX_REDIRECTS: usize = 10;

/// Fixed delay between attempts inside one retry round
pub const RETRY_DELAY: Duration = Duration::from_millis(150);

/// Lowest and highest HTTP status codes accepted in an expected-status set
pub const MIN_STATUS_CODE: u16 = 100;
pub const MAX_STATUS_CODE: u16 = 599;

/// Protocol used to decide whether a target is up
///
/// Always a resolved mode: the `auto` hint never reaches a `Checker`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CheckMode {
    /// Platform `ping` utility, one echo request per attempt
    Icmp,
    /// Plain HTTP GET
    Http,
    /// HTTP GET over TLS
    Https,
}

impl CheckMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            CheckMode::Icmp => "icmp",
            CheckMode::Http => "http",
            CheckMode::Https => "https",
        }
    }

    /// URL scheme prefix for HTTP modes, `None` for ICMP
    pub fn scheme_prefix(&self) -> Option<&'static str> {
        match self {
            CheckMode::Icmp => None,
            CheckMode::Http => Some("http://"),
            CheckMode::Https => Some("https://"),
        }
    }
}

impl fmt::Display for CheckMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Immutable checking configuration built once from validated input
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckOptions {
    /// Resolved check mode
    pub mode: CheckMode,
    /// Normalized target: URL for HTTP modes, host or IP for ICMP
    pub target: String,
    /// Per-check deadline (HTTP request deadline, ping wait time)
    pub timeout: Duration,
    /// Acceptable HTTP status codes; empty means 200..=399
    pub expected_statuses: BTreeSet<u16>,
}

impl CheckOptions {
    pub fn new(mode: CheckMode, target: impl Into<String>, timeout: Duration) -> Self {
        Self {
            mode,
            target: target.into(),
            timeout,
            expected_statuses: BTreeSet::new(),
        }
    }

    pub fn with_expected_statuses(mut self, statuses: BTreeSet<u16>) -> Self {
        self.expected_statuses = statuses;
        self
    }

    /// Decide whether a final HTTP status counts as up
    ///
    /// With no expected set, every 2xx and 3xx status is success. A 3xx can
    /// only get here when the client stopped following redirects.
    pub fn is_success_status(&self, status_code: u16) -> bool {
        if self.expected_statuses.is_empty() {
            (200..=399).contains(&status_code)
        } else {
            self.expected_statuses.contains(&status_code)
        }
    }
}

/// Errors produced while validating input or checking a target
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CheckError {
    #[error("target is empty")]
    InvalidTarget,
    #[error("--mode={mode} cannot use {scheme} target")]
    ModeTargetMismatch { mode: CheckMode, scheme: &'static str },
    #[error("unsupported mode: {0}")]
    UnsupportedMode(String),
    #[error("{0}")]
    InvalidStatusCode(String),
    #[error("timeout must be > 0")]
    InvalidTimeout,
    #[error("failed to create HTTP client: {0}")]
    ClientBuild(String),
    #[error("{0}")]
    Transport(String),
    #[error("stopped after {0} redirects")]
    TooManyRedirects(usize),
    #[error("ping failed: {0}")]
    Subprocess(String),
    #[error("check cancelled")]
    Cancelled,
}

impl CheckError {
    /// Errors raised before any check runs; these map to a usage exit code
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            CheckError::InvalidTarget
                | CheckError::ModeTargetMismatch { .. }
                | CheckError::UnsupportedMode(_)
                | CheckError::InvalidStatusCode(_)
                | CheckError::InvalidTimeout
        )
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, CheckError::Cancelled)
    }
}
