//! Expected HTTP status list parsing

use crate::core::check::types::{CheckError, MAX_STATUS_CODE, MIN_STATUS_CODE};
use std::collections::BTreeSet;

/// Parse a comma-separated list of HTTP status codes
///
/// Empty or whitespace-only input yields an empty set, which tells the
/// checker to fall back to the 200..=399 range. Empty tokens are skipped so
/// a trailing comma is harmless.
///
/// # Examples
/// - `"200, 204,301"` → `{200, 204, 301}`
/// - `"200,200"` → `{200}`
/// - `""` → `{}`
pub fn parse_expected_statuses(input: &str) -> Result<BTreeSet<u16>, CheckError> {
    let mut statuses = BTreeSet::new();

    for token in input.split(',').map(str::trim).filter(|t| !t.is_empty()) {
        let code: i64 = token.parse().map_err(|_| {
            CheckError::InvalidStatusCode(format!("{:?} is not a valid status code", token))
        })?;

        if code < MIN_STATUS_CODE as i64 || code > MAX_STATUS_CODE as i64 {
            return Err(CheckError::InvalidStatusCode(format!(
                "{} is outside valid HTTP status range",
                code
            )));
        }
        statuses.insert(code as u16);
    }

    Ok(statuses)
}
