//! Version string resolution
//!
//! Order: build-time `BEEPBOOP_VERSION`, a `VERSION` file in the working
//! directory or next to the executable, then the crate version.

use std::path::PathBuf;

/// Version injected at build time, e.g. by a release pipeline
const BUILD_VERSION: Option<&str> = option_env!("BEEPBOOP_VERSION");

pub fn resolve_version() -> String {
    if let Some(version) = BUILD_VERSION.and_then(normalize_version) {
        if version != "dev" {
            return version;
        }
    }

    if let Some(version) = resolve_version_from_file() {
        return version;
    }

    normalize_version(env!("CARGO_PKG_VERSION")).unwrap_or_else(|| "dev".to_string())
}

/// Trim, drop a leading `v`, reject empty and `(devel)` markers
pub fn normalize_version(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed == "(devel)" {
        return None;
    }
    let version = trimmed.strip_prefix('v').unwrap_or(trimmed);
    if version.is_empty() {
        return None;
    }
    Some(version.to_string())
}

fn version_file_candidates() -> Vec<PathBuf> {
    let mut paths = vec![PathBuf::from("VERSION")];
    if let Ok(executable) = std::env::current_exe() {
        if let Some(dir) = executable.parent() {
            paths.push(dir.join("VERSION"));
        }
    }
    paths
}

fn resolve_version_from_file() -> Option<String> {
    version_from_files(&version_file_candidates())
}

/// Read the first usable version from `paths`
pub fn version_from_files(paths: &[PathBuf]) -> Option<String> {
    paths
        .iter()
        .filter_map(|path| std::fs::read_to_string(path).ok())
        .find_map(|content| normalize_version(&content))
}
