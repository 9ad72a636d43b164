//! Target Reachability Checking
//!
//! - Mode resolution from a `--mode` hint and raw target
//! - Expected status list parsing
//! - HTTP/HTTPS checks through a reusable probe client
//! - ICMP checks through the platform `ping` utility
//! - Retry rounds with a fixed inter-attempt delay

pub mod checker;
pub mod client;
pub mod mode;
pub mod ping;
pub mod status;
pub mod types;

// Re-export public API
pub use checker::Checker;
pub use client::{HttpProbeClient, IsahcProbeClient};
pub use mode::resolve_mode_and_target;
pub use ping::{build_ping_args, build_ping_args_for, PingExit, PingPlatform, PingRunner, SystemPingRunner};
pub use status::parse_expected_statuses;
pub use types::*;
