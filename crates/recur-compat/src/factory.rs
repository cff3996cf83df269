//! Entry points building date sequences from raw recurrence data.
//!
//! `rdata` holds RRULE, EXRULE, RDATE and EXDATE content lines, one per line,
//! folded as in RFC 5545. The governing zone reads zone-less RDATE/EXDATE
//! values; it defaults to UTC for a date start and to the start's own zone
//! for a zoned start.

use chrono::{DateTime, NaiveDate};
use chrono_tz::Tz;
use recur_core::config::Settings;
use recur_rfc::error::RfcError;
use recur_rfc::rfc::ical::expand::{CompileOptions, DateValueCursor, compile, resolve_tzid};

use crate::convert::{local_date_to_date_value, zoned_to_date_value};
use crate::error::CompatResult;
use crate::local_date::{LocalDateIterable, LocalDateIterator};
use crate::zoned::{ZonedDateTimeIterable, ZonedDateTimeIterator};

fn options(strict: bool) -> CompileOptions {
    if strict {
        CompileOptions::strict()
    } else {
        CompileOptions::lenient()
    }
}

/// ## Summary
/// Builds a calendar-date sequence starting at `start`.
///
/// ## Errors
/// With `strict` set, returns the first malformed content line.
pub fn create_local_date_iterator(
    rdata: &str,
    start: NaiveDate,
    tzid: Option<Tz>,
    strict: bool,
) -> CompatResult<LocalDateIterator> {
    create_local_date_iterator_with_options(rdata, start, tzid, &options(strict))
}

/// ## Summary
/// Builds a calendar-date sequence with explicit compile options.
///
/// ## Errors
/// With `options.strict` set, returns the first malformed content line.
pub fn create_local_date_iterator_with_options(
    rdata: &str,
    start: NaiveDate,
    tzid: Option<Tz>,
    options: &CompileOptions,
) -> CompatResult<LocalDateIterator> {
    create_local_date_iterable_with_options(rdata, start, tzid, options).map(|it| it.iter())
}

/// ## Summary
/// Builds a restartable calendar-date sequence starting at `start`.
///
/// ## Errors
/// With `strict` set, returns the first malformed content line.
pub fn create_local_date_iterable(
    rdata: &str,
    start: NaiveDate,
    tzid: Option<Tz>,
    strict: bool,
) -> CompatResult<LocalDateIterable> {
    create_local_date_iterable_with_options(rdata, start, tzid, &options(strict))
}

/// ## Summary
/// Builds a restartable calendar-date sequence with explicit compile options.
///
/// The start is a whole day, so the series yields whole days.
///
/// ## Errors
/// With `options.strict` set, returns the first malformed content line.
pub fn create_local_date_iterable_with_options(
    rdata: &str,
    start: NaiveDate,
    tzid: Option<Tz>,
    options: &CompileOptions,
) -> CompatResult<LocalDateIterable> {
    let governing = tzid.unwrap_or(chrono_tz::UTC);
    let compiled = compile(rdata, local_date_to_date_value(start), governing, options)?;
    Ok(LocalDateIterable::new(compiled))
}

/// ## Summary
/// Builds a zoned sequence starting at `start`.
///
/// ## Errors
/// With `strict` set, returns the first malformed content line.
pub fn create_zoned_date_time_iterator(
    rdata: &str,
    start: &DateTime<Tz>,
    tzid: Option<Tz>,
    strict: bool,
) -> CompatResult<ZonedDateTimeIterator> {
    create_zoned_date_time_iterator_with_options(rdata, start, tzid, &options(strict))
}

/// ## Summary
/// Builds a zoned sequence with explicit compile options.
///
/// ## Errors
/// With `options.strict` set, returns the first malformed content line.
pub fn create_zoned_date_time_iterator_with_options(
    rdata: &str,
    start: &DateTime<Tz>,
    tzid: Option<Tz>,
    options: &CompileOptions,
) -> CompatResult<ZonedDateTimeIterator> {
    create_zoned_date_time_iterable_with_options(rdata, start, tzid, options).map(|it| it.iter())
}

/// ## Summary
/// Builds a restartable zoned sequence starting at `start`.
///
/// ## Errors
/// With `strict` set, returns the first malformed content line.
pub fn create_zoned_date_time_iterable(
    rdata: &str,
    start: &DateTime<Tz>,
    tzid: Option<Tz>,
    strict: bool,
) -> CompatResult<ZonedDateTimeIterable> {
    create_zoned_date_time_iterable_with_options(rdata, start, tzid, &options(strict))
}

/// ## Summary
/// Builds a restartable zoned sequence with explicit compile options.
///
/// The start instant is shifted into the governing zone and the rule is
/// expanded against that wall clock, so occurrences keep their local time
/// across DST transitions.
///
/// ## Errors
/// With `options.strict` set, returns the first malformed content line.
pub fn create_zoned_date_time_iterable_with_options(
    rdata: &str,
    start: &DateTime<Tz>,
    tzid: Option<Tz>,
    options: &CompileOptions,
) -> CompatResult<ZonedDateTimeIterable> {
    let governing = tzid.unwrap_or_else(|| start.timezone());
    let compiled = compile(rdata, zoned_to_date_value(start, governing), governing, options)?;
    Ok(ZonedDateTimeIterable::new(compiled, governing))
}

/// Wraps an already-compiled cursor as a calendar-date sequence.
#[must_use]
pub fn local_date_iterator_from<C: DateValueCursor>(cursor: C) -> LocalDateIterator<C> {
    LocalDateIterator::new(cursor)
}

/// Wraps an already-compiled cursor as a zoned sequence labelled UTC.
#[must_use]
pub fn zoned_date_time_iterator_from<C: DateValueCursor>(cursor: C) -> ZonedDateTimeIterator<C> {
    ZonedDateTimeIterator::new(cursor, chrono_tz::UTC)
}

/// ## Summary
/// Resolves the configured default governing zone.
///
/// ## Errors
/// Returns `CompatError::Core` if the settings are invalid, or
/// `CompatError::Compile` if the zone identifier is unknown.
pub fn resolve_default_zone(settings: &Settings) -> CompatResult<Tz> {
    settings.validate()?;
    let tz = resolve_tzid(&settings.recurrence.default_tzid).map_err(RfcError::from)?;
    tracing::debug!(%tz, "Resolved default governing zone");
    Ok(tz)
}
