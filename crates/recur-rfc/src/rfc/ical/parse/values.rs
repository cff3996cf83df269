//! RDATE/EXDATE value parsers (RFC 5545 §3.3.4, §3.3.5, §3.3.9).

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

use super::error::{ParseError, ParseErrorKind, ParseResult};
use crate::rfc::ical::core::ContentLine;

/// One item of an RDATE or EXDATE value list, before zone resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DateSpec {
    /// `YYYYMMDD`.
    Date(NaiveDate),
    /// `YYYYMMDDTHHMMSSZ`.
    Utc(NaiveDateTime),
    /// `YYYYMMDDTHHMMSS`, zoned by a TZID parameter or floating.
    Local {
        date_time: NaiveDateTime,
        tzid: Option<String>,
    },
}

/// Parses a DATE value.
///
/// Format: YYYYMMDD (e.g., "19970714")
///
/// ## Errors
/// Returns `InvalidDate` if the string is not an 8-digit calendar date.
pub fn parse_date(s: &str) -> Result<NaiveDate, ParseErrorKind> {
    if s.len() != 8 || !s.bytes().all(|b| b.is_ascii_digit()) {
        return Err(ParseErrorKind::InvalidDate);
    }
    let field = |range: std::ops::Range<usize>| s[range].parse::<u32>().ok();
    let (Some(year), Some(month), Some(day)) = (field(0..4), field(4..6), field(6..8)) else {
        return Err(ParseErrorKind::InvalidDate);
    };
    let year = i32::try_from(year).map_err(|_err| ParseErrorKind::InvalidDate)?;
    NaiveDate::from_ymd_opt(year, month, day).ok_or(ParseErrorKind::InvalidDate)
}

/// Parses a TIME value, returning the time and whether it carried `Z`.
///
/// Format: HHMMSS[Z] (e.g., "133000", "133000Z")
///
/// ## Errors
/// Returns `InvalidTime` if the string is not a valid 6-digit time.
pub fn parse_time(s: &str) -> Result<(NaiveTime, bool), ParseErrorKind> {
    let (digits, is_utc) = match s.strip_suffix('Z') {
        Some(stripped) => (stripped, true),
        None => (s, false),
    };
    if digits.len() != 6 || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(ParseErrorKind::InvalidTime);
    }
    let field = |range: std::ops::Range<usize>| digits[range].parse::<u32>().ok();
    let (Some(hour), Some(minute), Some(second)) = (field(0..2), field(2..4), field(4..6)) else {
        return Err(ParseErrorKind::InvalidTime);
    };
    NaiveTime::from_hms_opt(hour, minute, second)
        .map(|time| (time, is_utc))
        .ok_or(ParseErrorKind::InvalidTime)
}

/// Parses a DATE-TIME value, returning it and whether it was in UTC.
///
/// Format: YYYYMMDD"T"HHMMSS[Z] (e.g., "19970714T133000Z")
///
/// ## Errors
/// Returns `InvalidDateTime` if the `T` separator is missing, otherwise the
/// kind reported by the date or time part.
pub fn parse_date_time(s: &str) -> Result<(NaiveDateTime, bool), ParseErrorKind> {
    let (date, time) = s
        .split_once(['T', 't'])
        .ok_or(ParseErrorKind::InvalidDateTime)?;
    let date = parse_date(date)?;
    let (time, is_utc) = parse_time(time)?;
    Ok((date.and_time(time), is_utc))
}

/// ## Summary
/// Parses the comma-separated value list of an RDATE or EXDATE line.
///
/// The `VALUE` parameter selects DATE, DATE-TIME or PERIOD items; without it
/// each item's own shape decides. For a PERIOD only the start counts.
///
/// ## Errors
/// Returns an error naming the first item that does not parse.
pub fn parse_date_list(line: &ContentLine, line_num: usize) -> ParseResult<Vec<DateSpec>> {
    let value_type = line.value_type().map(str::to_ascii_uppercase);
    let tzid = line.tzid();
    let value_column = line.value_offset + 1;

    let mut specs = Vec::new();
    let mut offset = 0;
    for item in line.raw_value.split(',') {
        let column = value_column + offset;
        offset += item.len() + 1;
        let item = item.trim();
        if item.is_empty() {
            continue;
        }
        let spec = parse_item(item, value_type.as_deref(), tzid).map_err(|kind| {
            ParseError::new(kind, line_num, column).with_context(format!("`{item}`"))
        })?;
        specs.push(spec);
    }

    if specs.is_empty() {
        return Err(ParseError::new(ParseErrorKind::InvalidDate, line_num, value_column)
            .with_context("empty value list"));
    }
    Ok(specs)
}

fn parse_item(
    item: &str,
    value_type: Option<&str>,
    tzid: Option<&str>,
) -> Result<DateSpec, ParseErrorKind> {
    match value_type {
        Some("DATE") => parse_date(item).map(DateSpec::Date),
        Some("PERIOD") => {
            let (start, end) = item.split_once('/').ok_or(ParseErrorKind::InvalidPeriod)?;
            let end_is_duration = end.trim_start_matches(['+', '-']).starts_with('P');
            if !end_is_duration && parse_date_time(end).is_err() {
                return Err(ParseErrorKind::InvalidPeriod);
            }
            date_time_spec(start, tzid).map_err(|_kind| ParseErrorKind::InvalidPeriod)
        }
        Some("DATE-TIME") => date_time_spec(item, tzid),
        _ if item.contains(['T', 't']) => date_time_spec(item, tzid),
        _ => parse_date(item).map(DateSpec::Date),
    }
}

fn date_time_spec(item: &str, tzid: Option<&str>) -> Result<DateSpec, ParseErrorKind> {
    let (date_time, is_utc) = parse_date_time(item)?;
    Ok(if is_utc {
        DateSpec::Utc(date_time)
    } else {
        DateSpec::Local {
            date_time,
            tzid: tzid.map(String::from),
        }
    })
}
