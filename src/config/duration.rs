//! Human-readable duration strings (`300ms`, `5s`, `1m30s`, `1.5s`)

use super::types::ConfigError;
use std::time::Duration;

const NANOS_PER_SEC: u128 = 1_000_000_000;

/// Parse a duration written as a sequence of `<number><unit>` components
///
/// Units: `ns`, `us`/`µs`, `ms`, `s`, `m`, `h`. Components may carry a
/// fraction (`1.5s`). A bare `0` is accepted; any other number needs a unit.
///
/// # Examples
/// - `"5s"` → 5 seconds
/// - `"1m30s"` → 90 seconds
/// - `"250ms"` → 250 milliseconds
pub fn parse_duration(input: &str) -> Result<Duration, ConfigError> {
    let invalid = || ConfigError::InvalidDuration(input.to_string());

    let s = input.trim();
    if s.starts_with('-') {
        return Err(ConfigError::InvalidDuration(format!(
            "{} (negative durations are not allowed)",
            input
        )));
    }
    let s = s.strip_prefix('+').unwrap_or(s);
    if s.is_empty() {
        return Err(invalid());
    }
    if s == "0" {
        return Ok(Duration::ZERO);
    }

    let mut rest = s;
    let mut total: u128 = 0;

    while !rest.is_empty() {
        let number_end = rest
            .find(|c: char| !(c.is_ascii_digit() || c == '.'))
            .unwrap_or(rest.len());
        let number = &rest[..number_end];
        rest = &rest[number_end..];

        let unit_end = rest
            .find(|c: char| c.is_ascii_digit() || c == '.')
            .unwrap_or(rest.len());
        let unit = &rest[..unit_end];
        rest = &rest[unit_end..];

        let unit_nanos: u128 = match unit {
            "ns" => 1,
            "us" | "µs" | "μs" => 1_000,
            "ms" => 1_000_000,
            "s" => NANOS_PER_SEC,
            "m" => 60 * NANOS_PER_SEC,
            "h" => 3_600 * NANOS_PER_SEC,
            "" => {
                return Err(ConfigError::InvalidDuration(format!(
                    "{} (missing unit)",
                    input
                )))
            }
            _ => {
                return Err(ConfigError::InvalidDuration(format!(
                    "{} (unknown unit {:?})",
                    input, unit
                )))
            }
        };

        let (int_part, frac_part) = number.split_once('.').unwrap_or((number, ""));
        if int_part.is_empty() && frac_part.is_empty() {
            return Err(invalid());
        }
        if !frac_part.chars().all(|c| c.is_ascii_digit()) {
            return Err(invalid());
        }

        let int_value: u128 = if int_part.is_empty() {
            0
        } else {
            int_part.parse().map_err(|_| invalid())?
        };
        let mut nanos = int_value.checked_mul(unit_nanos).ok_or_else(invalid)?;

        if !frac_part.is_empty() {
            let fraction: f64 = format!("0.{}", frac_part).parse().map_err(|_| invalid())?;
            nanos += (fraction * unit_nanos as f64).round() as u128;
        }

        total = total.checked_add(nanos).ok_or_else(invalid)?;
    }

    let secs = u64::try_from(total / NANOS_PER_SEC).map_err(|_| invalid())?;
    Ok(Duration::new(secs, (total % NANOS_PER_SEC) as u32))
}

/// Format a duration in the same notation `parse_duration` accepts
///
/// # Examples
/// - 5s → `"5s"`
/// - 90s → `"1m30s"`
/// - 250ms → `"250ms"`
/// - 1.5s → `"1.5s"`
pub fn format_duration(duration: Duration) -> String {
    if duration.is_zero() {
        return "0s".to_string();
    }

    let nanos = duration.as_nanos();
    if nanos < NANOS_PER_SEC {
        return if nanos % 1_000_000 == 0 {
            format!("{}ms", nanos / 1_000_000)
        } else if nanos % 1_000 == 0 {
            format!("{}µs", nanos / 1_000)
        } else {
            format!("{}ns", nanos)
        };
    }

    let total_secs = duration.as_secs();
    let hours = total_secs / 3_600;
    let minutes = (total_secs % 3_600) / 60;
    let seconds = total_secs % 60;
    let subsec = duration.subsec_nanos();

    let mut seconds_text = seconds.to_string();
    if subsec > 0 {
        let fraction = format!("{:09}", subsec);
        seconds_text.push('.');
        seconds_text.push_str(fraction.trim_end_matches('0'));
    }

    if hours > 0 {
        format!("{}h{}m{}s", hours, minutes, seconds_text)
    } else if minutes > 0 {
        format!("{}m{}s", minutes, seconds_text)
    } else {
        format!("{}s", seconds_text)
    }
}

/// serde adapter storing a `Duration` as a duration string
pub mod serde_str {
    use super::{format_duration, parse_duration};
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&format_duration(*duration))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let text = String::deserialize(deserializer)?;
        parse_duration(&text).map_err(serde::de::Error::custom)
    }
}
