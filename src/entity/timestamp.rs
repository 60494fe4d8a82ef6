//! Feed timestamp handling
//!
//! The service writes UTC timestamps with fractional seconds, e.g.
//! `2024-03-01T09:15:42.123456Z`.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{de, Deserialize, Deserializer};

/// Format used when writing timestamps back out
pub const DATE_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.6fZ";

// `%.f` accepts any number of fractional digits, including none
const PARSE_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.fZ";

/// Parses a feed timestamp
///
/// # Arguments
///
/// * `value` - The raw timestamp string
///
/// # Returns
///
/// * `Ok(DateTime<Utc>)` - The parsed instant
/// * `Err(chrono::ParseError)` - The string does not match the feed format
pub fn parse_timestamp(value: &str) -> Result<DateTime<Utc>, chrono::ParseError> {
    NaiveDateTime::parse_from_str(value, PARSE_FORMAT).map(|naive| naive.and_utc())
}

/// Formats a timestamp in the feed format
pub fn format_timestamp(timestamp: &DateTime<Utc>) -> String {
    timestamp.format(DATE_FORMAT).to_string()
}

/// Serde adapter for `updated` fields
pub(crate) fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_timestamp(&raw)
        .map_err(|e| de::Error::custom(format!("invalid timestamp '{}': {}", raw, e)))
}
