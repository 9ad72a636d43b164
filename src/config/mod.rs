pub mod defaults;
pub mod duration;
pub mod types;

pub use duration::{format_duration, parse_duration};
pub use types::{Config, ConfigError, RunSettings};

use std::env;
use std::path::{Path, PathBuf};

/// Environment variable pointing at an alternative config file
pub const CONFIG_ENV: &str = "BEEPBOOP_CONFIG";

const VALID_MODES: [&str; 4] = ["auto", "icmp", "http", "https"];

impl Config {
    /// Config file location: `BEEPBOOP_CONFIG`, else `<config dir>/beepboop/config.toml`
    pub fn config_path() -> Result<PathBuf, ConfigError> {
        if let Ok(path) = env::var(CONFIG_ENV) {
            if !path.trim().is_empty() {
                return Ok(PathBuf::from(path));
            }
        }

        let dir = dirs::config_dir().ok_or(ConfigError::ConfigDirNotFound)?;
        Ok(dir.join("beepboop").join("config.toml"))
    }

    /// Load defaults from the config file; a missing file yields built-in defaults
    pub fn load() -> Result<Self, ConfigError> {
        match Self::config_path() {
            Ok(path) => Self::load_from(&path),
            Err(ConfigError::ConfigDirNotFound) => Ok(Self::default()),
            Err(e) => Err(e),
        }
    }

    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

        toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    /// Write the built-in defaults to the config file unless one already exists
    ///
    /// Returns the path of the config file.
    pub fn init() -> Result<PathBuf, ConfigError> {
        let path = Self::config_path()?;
        Self::init_at(&path)?;
        Ok(path)
    }

    pub fn init_at(path: &Path) -> Result<bool, ConfigError> {
        if path.exists() {
            return Ok(false);
        }

        let write_error = |e: &dyn std::fmt::Display| ConfigError::WriteError {
            path: path.to_path_buf(),
            message: e.to_string(),
        };

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| write_error(&e))?;
        }
        let content = Self::default().to_toml()?;
        std::fs::write(path, content).map_err(|e| write_error(&e))?;
        Ok(true)
    }

    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::Usage(e.to_string()))
    }

    /// Validate values that can come from the file alone
    pub fn check(&self) -> Result<(), ConfigError> {
        validate_mode(&self.mode)?;
        validate_positive("interval", self.interval)?;
        validate_positive("timeout", self.timeout)?;
        Ok(())
    }
}

impl RunSettings {
    /// Enforce the invariants the checker relies on
    pub fn validate(mut self) -> Result<Self, ConfigError> {
        if self.target.trim().is_empty() {
            return Err(ConfigError::Usage("--target is required".to_string()));
        }
        validate_positive("interval", self.interval)?;
        validate_positive("timeout", self.timeout)?;
        self.mode = validate_mode(&self.mode)?;
        Ok(self)
    }
}

fn validate_positive(name: &str, value: std::time::Duration) -> Result<(), ConfigError> {
    if value.is_zero() {
        return Err(ConfigError::Usage(format!("--{} must be > 0", name)));
    }
    Ok(())
}

/// Normalize a mode hint to lowercase, rejecting unknown values
fn validate_mode(mode: &str) -> Result<String, ConfigError> {
    let normalized = mode.trim().to_ascii_lowercase();
    if VALID_MODES.contains(&normalized.as_str()) {
        Ok(normalized)
    } else {
        Err(ConfigError::Usage(
            "--mode must be one of auto|icmp|http|https".to_string(),
        ))
    }
}
