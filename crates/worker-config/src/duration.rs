//! Interval parsing for snapshot and backup settings

use std::time::Duration;

use crate::{Error, Result};

/// Parse a whole, non-negative number of seconds.
///
/// `field` names the setting being parsed and is only used for error
/// reporting. Zero is returned as `Duration::ZERO`; deciding what a zero
/// interval means is left to the caller.
pub fn parse_seconds(field: &'static str, value: &str) -> Result<Duration> {
    value
        .parse::<u64>()
        .map(Duration::from_secs)
        .map_err(|_| Error::InvalidDuration {
            field,
            value: value.to_string(),
        })
}
