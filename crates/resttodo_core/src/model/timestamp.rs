//! UTC timestamp formatting.
//!
//! Timestamps are ISO-8601 strings with fixed microsecond precision and a
//! `Z` suffix, so lexicographic order equals chronological order.
//! Reads also accept offset-less ISO-8601 values, which older databases hold.

use chrono::{DateTime, NaiveDateTime, SecondsFormat, Utc};

const NAIVE_ISO_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.f";

/// Returns the current UTC time as a stored timestamp string.
pub fn now_utc() -> String {
    format_utc(Utc::now())
}

/// Formats an instant using the stored timestamp layout.
pub fn format_utc(instant: DateTime<Utc>) -> String {
    instant.to_rfc3339_opts(SecondsFormat::Micros, true)
}

/// Returns whether `value` parses as a stored timestamp.
///
/// Offset-less values are taken as UTC.
pub fn is_valid(value: &str) -> bool {
    DateTime::parse_from_rfc3339(value).is_ok()
        || NaiveDateTime::parse_from_str(value, NAIVE_ISO_FORMAT).is_ok()
}
