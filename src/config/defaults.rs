use super::types::Config;
use std::time::Duration;

pub const DEFAULT_MODE: &str = "auto";
pub const DEFAULT_INTERVAL: Duration = Duration::from_secs(5);
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(3);

impl Default for Config {
    fn default() -> Self {
        Config {
            mode: DEFAULT_MODE.to_string(),
            interval: DEFAULT_INTERVAL,
            timeout: DEFAULT_TIMEOUT,
            retries: 0,
            status: String::new(),
            quiet: false,
            no_color: false,
        }
    }
}
