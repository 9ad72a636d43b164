//! Check Mode Resolution
//!
//! Maps a raw `--mode` hint and target string onto a concrete [`CheckMode`]
//! and the target the checker should use. Pure: no I/O, no network.

use crate::core::check::types::{CheckError, CheckMode};
use url::Url;

const HTTP_PREFIX: &str = "http://";
const HTTPS_PREFIX: &str = "https://";

/// Resolve a mode hint (`auto|icmp|http|https`) and target
///
/// # Examples
/// - `("auto", "example.com")` → `(Icmp, "example.com")`
/// - `("auto", "https://example.com")` → `(Https, "https://example.com")`
/// - `("http", "example.com")` → `(Http, "http://example.com")`
///
/// # Errors
/// * `InvalidTarget` - target is empty after trimming
/// * `ModeTargetMismatch` - explicit http/https mode given the other scheme
/// * `UnsupportedMode` - hint is not one of the four known values
pub fn resolve_mode_and_target(
    mode_hint: &str,
    target: &str,
) -> Result<(CheckMode, String), CheckError> {
    let trimmed = target.trim();
    if trimmed.is_empty() {
        return Err(CheckError::InvalidTarget);
    }

    match mode_hint.trim().to_ascii_lowercase().as_str() {
        "icmp" => Ok((CheckMode::Icmp, trimmed.to_string())),
        "http" => resolve_explicit(CheckMode::Http, trimmed),
        "https" => resolve_explicit(CheckMode::Https, trimmed),
        "auto" => Ok(resolve_auto(trimmed)),
        _ => Err(CheckError::UnsupportedMode(mode_hint.to_string())),
    }
}

/// Explicit HTTP mode: keep a matching scheme, reject the opposite one,
/// prefix anything else
fn resolve_explicit(mode: CheckMode, target: &str) -> Result<(CheckMode, String), CheckError> {
    let (own, other, other_name) = match mode {
        CheckMode::Https => (HTTPS_PREFIX, HTTP_PREFIX, "http"),
        _ => (HTTP_PREFIX, HTTPS_PREFIX, "https"),
    };

    if target.starts_with(own) {
        return Ok((mode, target.to_string()));
    }
    if target.starts_with(other) {
        return Err(CheckError::ModeTargetMismatch {
            mode,
            scheme: other_name,
        });
    }
    Ok((mode, format!("{}{}", own, target)))
}

fn resolve_auto(target: &str) -> (CheckMode, String) {
    if target.starts_with(HTTP_PREFIX) {
        return (CheckMode::Http, target.to_string());
    }
    if target.starts_with(HTTPS_PREFIX) {
        return (CheckMode::Https, target.to_string());
    }

    // Catches scheme variants the prefix test misses, e.g. "HTTP://host"
    match Url::parse(target).map(|url| url.scheme().to_string()) {
        Ok(scheme) if scheme == "http" => (CheckMode::Http, target.to_string()),
        Ok(scheme) if scheme == "https" => (CheckMode::Https, target.to_string()),
        _ => (CheckMode::Icmp, target.to_string()),
    }
}
