//! Zone-identifier resolution and local-time localization.
//!
//! IANA names resolve through `chrono-tz`; Windows zone names and
//! calendar-client prefixes are mapped through ICU first.

use chrono::{DateTime, LocalResult, NaiveDateTime, TimeDelta, TimeZone};
use chrono_tz::Tz;
use icu::time::zone::WindowsParser;
use icu::time::zone::iana::IanaParserExtended;
use std::collections::HashMap;
use std::str::FromStr;

/// Error during zone resolution or localization.
#[derive(Debug, thiserror::Error)]
pub enum ConversionError {
    /// Unknown or invalid timezone identifier.
    #[error("Unknown timezone: {0}")]
    UnknownTimezone(String),

    /// Local time that cannot be placed even after shifting past a DST gap.
    #[error("Non-existent time (DST gap): {0}")]
    NonExistentTime(String),
}

/// Resolver for TZID parameters seen while compiling one block of
/// recurrence data.
#[derive(Debug, Default)]
pub struct TimeZoneResolver {
    /// Cache of resolved zones by TZID as written.
    cache: HashMap<String, Tz>,
}

impl TimeZoneResolver {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// ## Summary
    /// Resolves a TZID to a `chrono_tz::Tz`, caching the result.
    ///
    /// ## Errors
    ///
    /// Returns `ConversionError::UnknownTimezone` if the TZID cannot be resolved.
    pub fn resolve(&mut self, tzid: &str) -> Result<Tz, ConversionError> {
        if let Some(tz) = self.cache.get(tzid) {
            return Ok(*tz);
        }

        let tz = resolve_tzid(tzid)?;
        self.cache.insert(tzid.to_string(), tz);
        Ok(tz)
    }
}

/// ## Summary
/// Resolves a zone identifier without caching.
///
/// Exact IANA names win; otherwise the identifier is normalized (prefix
/// stripping, Windows names, aliases) and parsed again.
///
/// ## Errors
///
/// Returns `ConversionError::UnknownTimezone` if no zone matches.
pub fn resolve_tzid(tzid: &str) -> Result<Tz, ConversionError> {
    let trimmed = tzid.trim();
    if let Ok(tz) = Tz::from_str(trimmed) {
        return Ok(tz);
    }
    Tz::from_str(&normalize_tzid(trimmed))
        .map_err(|_e| ConversionError::UnknownTimezone(tzid.to_string()))
}

/// Normalizes common calendar-client timezone identifiers to IANA names.
fn normalize_tzid(tzid: &str) -> String {
    let stripped = tzid
        .strip_prefix("/mozilla.org/")
        .or_else(|| tzid.strip_prefix("/softwarestudio.org/"))
        .unwrap_or(tzid);

    let windows_parser = WindowsParser::new();
    if let Some(tz) = windows_parser.parse(stripped, None) {
        let iana_parser = IanaParserExtended::new();
        if let Some(entry) = iana_parser.iter().find(|entry| entry.time_zone == tz) {
            return entry.canonical.to_string();
        }
    }

    let iana_parser = IanaParserExtended::new();
    let parsed = iana_parser.parse(stripped);
    if parsed.time_zone != icu::time::TimeZone::UNKNOWN {
        return parsed.canonical.to_string();
    }

    stripped.to_string()
}

/// ## Summary
/// Places a wall-clock time in a zone.
///
/// A time repeated by a DST fold takes the earlier instant (RFC 5545
/// §3.3.5). A time skipped by a DST gap is shifted forward by one hour.
///
/// ## Errors
///
/// Returns `ConversionError::NonExistentTime` if the shifted time still
/// does not exist.
pub fn localize(local_time: NaiveDateTime, tz: Tz) -> Result<DateTime<Tz>, ConversionError> {
    match tz.from_local_datetime(&local_time) {
        LocalResult::Single(dt) | LocalResult::Ambiguous(dt, _) => Ok(dt),
        LocalResult::None => {
            let shifted = local_time + TimeDelta::hours(1);
            tracing::trace!(%local_time, %tz, "Shifting local time past DST gap");
            tz.from_local_datetime(&shifted)
                .earliest()
                .ok_or_else(|| ConversionError::NonExistentTime(format!("{local_time} in {tz}")))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, Utc};

    fn naive(y: i32, m: u32, d: u32, h: u32, mi: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .and_then(|date| date.and_hms_opt(h, mi, 0))
            .expect("valid date-time")
    }

    #[test]
    fn resolve_standard_timezone() {
        let mut resolver = TimeZoneResolver::new();
        let tz = resolver.resolve("America/New_York").expect("should resolve");
        assert_eq!(tz, Tz::America__New_York);
        assert_eq!(resolve_tzid("UTC").expect("should resolve"), Tz::UTC);
    }

    #[test]
    fn resolve_windows_timezone() {
        assert_eq!(
            resolve_tzid("Eastern Standard Time").expect("should resolve"),
            Tz::America__New_York
        );
    }

    #[test]
    fn resolve_mozilla_prefix() {
        assert_eq!(
            resolve_tzid("/mozilla.org/Europe/Berlin").expect("should resolve"),
            Tz::Europe__Berlin
        );
    }

    #[test]
    fn resolve_unknown_timezone() {
        let mut resolver = TimeZoneResolver::new();
        assert!(matches!(
            resolver.resolve("Mars/Olympus_Mons"),
            Err(ConversionError::UnknownTimezone(_))
        ));
    }

    #[test]
    fn localize_standard_and_daylight() {
        let winter = localize(naive(2026, 1, 15, 10, 0), Tz::America__New_York).expect("exists");
        assert_eq!(winter.with_timezone(&Utc).naive_utc(), naive(2026, 1, 15, 15, 0));

        let summer = localize(naive(2026, 7, 15, 10, 0), Tz::America__New_York).expect("exists");
        assert_eq!(summer.with_timezone(&Utc).naive_utc(), naive(2026, 7, 15, 14, 0));
    }

    #[test]
    fn localize_fold_takes_earlier_instant() {
        // 01:30 happens twice on 2026-11-01 in New York.
        let dt = localize(naive(2026, 11, 1, 1, 30), Tz::America__New_York).expect("exists");
        assert_eq!(dt.with_timezone(&Utc).naive_utc(), naive(2026, 11, 1, 5, 30));
    }

    #[test]
    fn localize_gap_shifts_forward() {
        // 02:30 does not exist on 2026-03-08 in New York.
        let dt = localize(naive(2026, 3, 8, 2, 30), Tz::America__New_York).expect("shifted");
        assert_eq!(dt.with_timezone(&Utc).naive_utc(), naive(2026, 3, 8, 7, 30));
    }
}
