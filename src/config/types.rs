use super::duration;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Persistent defaults read from `config.toml`
///
/// Every key is optional in the file; missing keys keep their built-in
/// defaults. Command-line flags override whatever is loaded here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Check mode hint: auto | icmp | http | https
    pub mode: String,
    /// Polling interval between retry rounds
    #[serde(with = "duration::serde_str")]
    pub interval: Duration,
    /// Per-check timeout
    #[serde(with = "duration::serde_str")]
    pub timeout: Duration,
    /// Additional attempts per round
    pub retries: u32,
    /// Expected HTTP status codes, comma separated
    pub status: String,
    /// Suppress non-essential output
    pub quiet: bool,
    /// Disable ANSI colours
    pub no_color: bool,
}

/// Fully resolved settings for one run: defaults, then file, then flags
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSettings {
    pub target: String,
    pub mode: String,
    pub interval: Duration,
    pub timeout: Duration,
    pub retries: u32,
    pub once: bool,
    pub status: String,
    pub quiet: bool,
    pub no_color: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {message}")]
    ReadError { path: PathBuf, message: String },
    #[error("failed to parse config {path}: {message}")]
    ParseError { path: PathBuf, message: String },
    #[error("failed to write config {path}: {message}")]
    WriteError { path: PathBuf, message: String },
    #[error("invalid duration: {0}")]
    InvalidDuration(String),
    #[error("{0}")]
    Usage(String),
    #[error("configuration directory not found")]
    ConfigDirNotFound,
}
