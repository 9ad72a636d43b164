use crate::config::{parse_duration, Config, RunSettings};
use clap::Parser;
use std::time::Duration;

#[derive(Parser, Debug)]
#[command(name = "beepboop")]
#[command(about = "Wait until a host or URL responds, then beep")]
#[command(disable_version_flag = true)]
pub struct Cli {
    /// Target host/IP/URL to check
    #[arg(short = 't', long = "target")]
    pub target: Option<String>,

    /// Target given without `--target`
    #[arg(value_name = "TARGET", conflicts_with = "target")]
    pub target_arg: Option<String>,

    /// Check mode: auto|icmp|http|https
    #[arg(short = 'm', long = "mode")]
    pub mode: Option<String>,

    /// Polling interval (e.g. 5s, 500ms, 1m30s)
    #[arg(short = 'i', long = "interval", value_parser = parse_duration_arg)]
    pub interval: Option<Duration>,

    /// Per-check timeout (e.g. 3s)
    #[arg(long = "timeout", value_parser = parse_duration_arg)]
    pub timeout: Option<Duration>,

    /// Additional retry attempts per interval
    #[arg(short = 'r', long = "retries")]
    pub retries: Option<u32>,

    /// Run one check and exit
    #[arg(long = "once")]
    pub once: bool,

    /// Expected HTTP status codes, comma-separated (e.g. 200,204)
    #[arg(short = 's', long = "status")]
    pub status: Option<String>,

    /// Suppress non-essential output
    #[arg(short = 'q', long = "quiet")]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long = "no-color")]
    pub no_color: bool,

    /// Print version and exit
    #[arg(short = 'V', long = "version")]
    pub version: bool,

    /// Write a default config file and exit
    #[arg(long = "init")]
    pub init: bool,

    /// Print the effective config file values and exit
    #[arg(long = "print-config")]
    pub print_config: bool,
}

impl Cli {
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Layer flags over file defaults and validate the result
    pub fn resolve(&self, config: Config) -> Result<RunSettings, crate::config::ConfigError> {
        RunSettings {
            target: self
                .target
                .clone()
                .or_else(|| self.target_arg.clone())
                .unwrap_or_default(),
            mode: self.mode.clone().unwrap_or(config.mode),
            interval: self.interval.unwrap_or(config.interval),
            timeout: self.timeout.unwrap_or(config.timeout),
            retries: self.retries.unwrap_or(config.retries),
            once: self.once,
            status: self.status.clone().unwrap_or(config.status),
            quiet: self.quiet || config.quiet,
            no_color: self.no_color || config.no_color,
        }
        .validate()
    }
}

fn parse_duration_arg(value: &str) -> Result<Duration, String> {
    parse_duration(value).map_err(|e| e.to_string())
}
