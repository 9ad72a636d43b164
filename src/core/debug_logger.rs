use std::collections::HashMap;
use std::env;
use std::fs::{File, OpenOptions};
use std::io::{BufReader, Write};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};

use chrono::Local;
use flate2::{write::GzEncoder, Compression};
use fs2::FileExt;
use regex::Regex;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// Hardcoded rotation policy
const LOG_ROTATION_SIZE_MB: u64 = 8;
const MAX_ARCHIVES: u32 = 5;
const ROTATION_CHECK_INTERVAL: u32 = 200;

/// Environment variable enabling the debug log
pub const DEBUG_ENV: &str = "BEEPBOOP_DEBUG";
/// Environment variable overriding the debug log location
pub const DEBUG_LOG_ENV: &str = "BEEPBOOP_DEBUG_LOG";

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct LogEntry {
    pub timestamp: String,                              // ISO-8601 with timezone
    pub level: String,                                  // DEBUG, ERROR, CHECK
    pub component: String,                              // Component name
    pub event: String,                                  // Event type
    pub message: String,                                // Human readable message (redacted)
    pub correlation_id: Option<String>,                 // Session id of this run
    pub fields: HashMap<String, serde_json::Value>,     // Structured data
}

struct RotatingLogger {
    log_path: PathBuf,
    write_count: AtomicU32,
}

impl RotatingLogger {
    fn new(log_path: PathBuf) -> Self {
        if let Some(parent) = log_path.parent() {
            let _ = std::fs::create_dir_all(parent);
        }

        Self {
            log_path,
            write_count: AtomicU32::new(0),
        }
    }

    fn write_with_rotation(&self, json_line: &str) -> Result<(), std::io::Error> {
        if self.write_count.fetch_add(1, Ordering::Relaxed) % ROTATION_CHECK_INTERVAL == 0 {
            let _ = self.rotate_if_needed(); // Don't let rotation errors stop logging
        }

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.log_path)?;

        writeln!(file, "{}", json_line)?;
        Ok(())
    }

    fn rotate_if_needed(&self) -> Result<(), std::io::Error> {
        if !self.needs_rotation()? {
            return Ok(());
        }

        // Several beepboop processes may share one log file
        let lock_path = self.log_path.with_extension("lock");
        let lock_file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(false)
            .open(&lock_path)?;

        match lock_file.try_lock_exclusive() {
            Ok(()) => {
                if self.needs_rotation()? {
                    self.perform_rotation()?;
                }
                let _ = std::fs::remove_file(&lock_path);
                Ok(())
            }
            Err(_) => Ok(()),
        }
    }

    fn needs_rotation(&self) -> Result<bool, std::io::Error> {
        if !self.log_path.exists() {
            return Ok(false);
        }

        let metadata = std::fs::metadata(&self.log_path)?;
        Ok(metadata.len() >= LOG_ROTATION_SIZE_MB * 1024 * 1024)
    }

    fn base_name(&self) -> String {
        self.log_path
            .file_stem()
            .map(|stem| stem.to_string_lossy().to_string())
            .unwrap_or_else(|| "beepboop-debug".to_string())
    }

    fn log_dir(&self) -> &Path {
        self.log_path.parent().unwrap_or_else(|| Path::new("."))
    }

    fn perform_rotation(&self) -> Result<(), std::io::Error> {
        let timestamp = Local::now().format("%Y%m%d_%H%M%S");
        let archive_path = self
            .log_dir()
            .join(format!("{}.{}.gz", self.base_name(), timestamp));

        let temp_path = self.log_path.with_extension("rotating");
        std::fs::rename(&self.log_path, &temp_path)?;

        let source_file = File::open(&temp_path)?;
        let target_file = File::create(&archive_path)?;
        let mut encoder = GzEncoder::new(target_file, Compression::default());
        std::io::copy(&mut BufReader::new(source_file), &mut encoder)?;
        encoder.finish()?;

        std::fs::remove_file(&temp_path)?;

        let _ = self.cleanup_old_archives();

        Ok(())
    }

    fn cleanup_old_archives(&self) -> Result<(), std::io::Error> {
        let prefix = format!("{}.", self.base_name());

        let mut archives = Vec::new();
        for entry in std::fs::read_dir(self.log_dir())? {
            let entry = entry?;
            let name = entry.file_name().to_string_lossy().to_string();

            if name.starts_with(&prefix) && name.ends_with(".gz") {
                archives.push((entry.path(), entry.metadata()?.modified()?));
            }
        }

        archives.sort_by_key(|(_, modified)| *modified);
        if archives.len() > MAX_ARCHIVES as usize {
            let to_remove = archives.len() - MAX_ARCHIVES as usize;
            for (path, _) in archives.iter().take(to_remove) {
                let _ = std::fs::remove_file(path);
            }
        }

        Ok(())
    }
}

/// JSON Lines debug logger, off unless `BEEPBOOP_DEBUG` is set
#[derive(Clone)]
pub struct DebugLogger {
    enabled: bool,
    rotating_logger: Option<Arc<Mutex<RotatingLogger>>>,
    session_id: String,
    redaction_patterns: Arc<Vec<(Regex, &'static str)>>,
}

impl Default for DebugLogger {
    fn default() -> Self {
        Self::new()
    }
}

impl DebugLogger {
    /// Create a logger configured from the environment
    pub fn new() -> Self {
        let enabled = Self::parse_debug_enabled(env::var(DEBUG_ENV).ok().as_deref());
        if enabled {
            Self::build(Some(Self::get_log_path()))
        } else {
            Self::build(None)
        }
    }

    /// Create a logger that writes nothing
    pub fn disabled() -> Self {
        Self::build(None)
    }

    /// Create an enabled logger writing to `log_path`
    pub fn with_path(log_path: PathBuf) -> Self {
        Self::build(Some(log_path))
    }

    fn build(log_path: Option<PathBuf>) -> Self {
        let session_id = Uuid::new_v4().to_string()[..8].to_string();

        Self {
            enabled: log_path.is_some(),
            rotating_logger: log_path.map(|path| Arc::new(Mutex::new(RotatingLogger::new(path)))),
            session_id,
            redaction_patterns: Arc::new(Self::compile_redaction_patterns()),
        }
    }

    /// Parse the debug switch
    /// Supports: true/false, 1/0, yes/no, on/off (case insensitive)
    pub fn parse_debug_enabled(value: Option<&str>) -> bool {
        value
            .map(|v| matches!(v.trim().to_lowercase().as_str(), "true" | "1" | "yes" | "on"))
            .unwrap_or(false)
    }

    /// Log location: `BEEPBOOP_DEBUG_LOG`, else `~/.beepboop/beepboop-debug.log`
    pub fn get_log_path() -> PathBuf {
        if let Ok(path) = env::var(DEBUG_LOG_ENV) {
            if !path.trim().is_empty() {
                return PathBuf::from(path);
            }
        }

        let mut log_path = dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));
        log_path.push(".beepboop");
        log_path.push("beepboop-debug.log");
        log_path
    }

    fn compile_redaction_patterns() -> Vec<(Regex, &'static str)> {
        let patterns = [
            (r"(?i)([a-z][a-z0-9+.-]*://)[^/@\s]+@", "${1}[REDACTED]@"),
            (r"(?i)((?:token|password|passwd|secret|api[_-]?key|key)=)[^&\s]+", "${1}[REDACTED]"),
            (r"(?i)(authorization[:\s]+)[^\s]+", "${1}[REDACTED]"),
        ];

        patterns
            .iter()
            .filter_map(|(pattern, replacement)| Regex::new(pattern).ok().map(|re| (re, *replacement)))
            .collect()
    }

    /// Strip credentials that may be embedded in target URLs
    pub fn redact_sensitive_data(&self, text: &str) -> String {
        let mut redacted = text.to_string();
        for (regex, replacement) in self.redaction_patterns.iter() {
            redacted = regex.replace_all(&redacted, *replacement).to_string();
        }
        redacted
    }

    fn log_sync(
        &self,
        level: &str,
        component: &str,
        event: &str,
        message: &str,
        fields: HashMap<String, serde_json::Value>,
    ) {
        if !self.enabled {
            return;
        }

        let fields = fields
            .into_iter()
            .map(|(key, value)| match value {
                serde_json::Value::String(s) => {
                    (key, serde_json::Value::String(self.redact_sensitive_data(&s)))
                }
                other => (key, other),
            })
            .collect();

        let entry = LogEntry {
            timestamp: Local::now().to_rfc3339(),
            level: level.to_string(),
            component: component.to_string(),
            event: event.to_string(),
            message: self.redact_sensitive_data(message),
            correlation_id: Some(self.session_id.clone()),
            fields,
        };

        if let Some(logger) = &self.rotating_logger {
            if let Ok(logger) = logger.lock() {
                if let Ok(json_line) = serde_json::to_string(&entry) {
                    let _ = logger.write_with_rotation(&json_line); // Don't crash on logging errors
                }
            }
        }
    }

    pub fn debug_sync(&self, component: &str, event: &str, message: &str) {
        self.log_sync("DEBUG", component, event, message, HashMap::new());
    }

    pub fn error_sync(&self, component: &str, event: &str, message: &str) {
        self.log_sync("ERROR", component, event, message, HashMap::new());
    }

    // Typed events for the check lifecycle

    pub fn check_start(&self, mode: &str, target: &str, timeout_ms: u64) {
        let mut fields = HashMap::new();
        fields.insert("mode".to_string(), serde_json::Value::String(mode.to_string()));
        fields.insert("target".to_string(), serde_json::Value::String(target.to_string()));
        fields.insert("timeout_ms".to_string(), serde_json::Value::Number(timeout_ms.into()));

        self.log_sync(
            "CHECK",
            "Checker",
            "check_start",
            &format!("Starting {} check of {}", mode, target),
            fields,
        );
    }

    pub fn check_end(&self, mode: &str, up: bool, duration_ms: u64, error: Option<&str>) {
        let mut fields = HashMap::new();
        fields.insert("mode".to_string(), serde_json::Value::String(mode.to_string()));
        fields.insert("up".to_string(), serde_json::Value::Bool(up));
        fields.insert("duration_ms".to_string(), serde_json::Value::Number(duration_ms.into()));
        if let Some(error) = error {
            fields.insert("error".to_string(), serde_json::Value::String(error.to_string()));
        }

        let state = if up { "up" } else { "down" };
        self.log_sync(
            "CHECK",
            "Checker",
            "check_end",
            &format!("Check completed: {} ({}ms)", state, duration_ms),
            fields,
        );
    }

    pub fn retry_wait(&self, attempt: u32, attempts: u32, delay_ms: u64) {
        let mut fields = HashMap::new();
        fields.insert("attempt".to_string(), serde_json::Value::Number(attempt.into()));
        fields.insert("attempts".to_string(), serde_json::Value::Number(attempts.into()));
        fields.insert("delay_ms".to_string(), serde_json::Value::Number(delay_ms.into()));

        self.log_sync(
            "CHECK",
            "Checker",
            "retry_wait",
            &format!("Attempt {}/{} failed, retrying in {}ms", attempt, attempts, delay_ms),
            fields,
        );
    }

    pub fn round_complete(&self, round: u64, up: bool, error: Option<&str>) {
        let mut fields = HashMap::new();
        fields.insert("round".to_string(), serde_json::Value::Number(round.into()));
        fields.insert("up".to_string(), serde_json::Value::Bool(up));
        if let Some(error) = error {
            fields.insert("error".to_string(), serde_json::Value::String(error.to_string()));
        }

        self.log_sync(
            "CHECK",
            "Poller",
            "round_complete",
            &format!("Round {} complete", round),
            fields,
        );
    }

    pub fn run_outcome(&self, outcome: &str, exit_code: i32) {
        let mut fields = HashMap::new();
        fields.insert("outcome".to_string(), serde_json::Value::String(outcome.to_string()));
        fields.insert("exit_code".to_string(), serde_json::Value::Number(exit_code.into()));

        self.log_sync(
            "CHECK",
            "Poller",
            "run_outcome",
            &format!("Run finished: {} (exit {})", outcome, exit_code),
            fields,
        );
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn get_session_id(&self) -> &str {
        &self.session_id
    }
}

pub fn get_debug_logger() -> DebugLogger {
    DebugLogger::new()
}
