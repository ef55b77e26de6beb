//! Shared timestamp parsing for listening-history exports.
//!
//! Every export states times in UTC, either implicitly or with an explicit
//! offset. All functions return whole seconds since the Unix epoch.

use chrono::{DateTime, NaiveDateTime};

use crate::SourceError;

/// Parses a Last.fm export time such as `"01 Jan 2020 00:00"` (UTC).
///
/// # Errors
///
/// Returns [`SourceError::Timestamp`] if the string does not match.
pub fn parse_lastfm_time(s: &str) -> Result<i64, SourceError> {
    NaiveDateTime::parse_from_str(s.trim(), "%d %b %Y %H:%M")
        .map(|naive| naive.and_utc().timestamp())
        .map_err(|source| SourceError::Timestamp {
            value: s.to_string(),
            source,
        })
}

/// Parses an ISO 8601 timestamp with an offset, such as
/// `"2020-01-01T12:34:56Z"`. A trailing `Z` is read as `+0000`.
///
/// # Errors
///
/// Returns [`SourceError::Timestamp`] if the string does not match.
pub fn parse_iso_offset(s: &str) -> Result<i64, SourceError> {
    DateTime::parse_from_str(&s.trim().replace('Z', "+0000"), "%Y-%m-%dT%H:%M:%S%z")
        .map(|dt| dt.timestamp())
        .map_err(|source| SourceError::Timestamp {
            value: s.to_string(),
            source,
        })
}

/// Parses a minute-precision UTC time such as `"2020-01-01 12:34"`.
///
/// # Errors
///
/// Returns [`SourceError::Timestamp`] if the string does not match.
pub fn parse_minute_time(s: &str) -> Result<i64, SourceError> {
    NaiveDateTime::parse_from_str(s.trim(), "%Y-%m-%d %H:%M")
        .map(|naive| naive.and_utc().timestamp())
        .map_err(|source| SourceError::Timestamp {
            value: s.to_string(),
            source,
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_lastfm_time() {
        assert_eq!(parse_lastfm_time("01 Jan 2020 00:00").unwrap(), 1_577_836_800);
        assert_eq!(parse_lastfm_time("15 Mar 2021 14:30").unwrap(), 1_615_818_600);
    }

    #[test]
    fn rejects_malformed_lastfm_time() {
        assert!(parse_lastfm_time("2020-01-01 00:00").is_err());
        assert!(parse_lastfm_time("").is_err());
    }

    #[test]
    fn parses_zulu_iso_timestamp() {
        assert_eq!(parse_iso_offset("2020-01-01T00:00:00Z").unwrap(), 1_577_836_800);
    }

    #[test]
    fn parses_offset_iso_timestamp() {
        assert_eq!(
            parse_iso_offset("2020-01-01T01:00:00+0100").unwrap(),
            1_577_836_800
        );
    }

    #[test]
    fn parses_minute_time() {
        assert_eq!(parse_minute_time("2020-01-01 00:01").unwrap(), 1_577_836_860);
        assert!(parse_minute_time("01 Jan 2020 00:01").is_err());
    }
}
