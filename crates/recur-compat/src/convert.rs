//! Conversions between neutral date values and consumer date types.
//!
//! These functions are total: a `DateValue` is always a valid calendar
//! value, and every consumer type maps onto one.

use chrono::{DateTime, NaiveDate, TimeZone};
use chrono_tz::Tz;
use recur_rfc::rfc::ical::core::DateValue;

/// Returns the calendar day of `value`; any time of day is dropped.
#[must_use]
pub fn date_value_to_local_date(value: DateValue) -> NaiveDate {
    value.date_part()
}

/// ## Summary
/// Returns a whole-day value for `date`.
///
/// No time of day is attached, so advancing to the result never skips an
/// occurrence that falls on `date` itself.
#[must_use]
pub fn local_date_to_date_value(date: NaiveDate) -> DateValue {
    DateValue::WholeDay(date)
}

/// ## Summary
/// Returns `value` as a date-time labelled UTC.
///
/// A timed value keeps its UTC wall clock; a whole-day value becomes
/// midnight UTC on its day. Output is never re-projected into another zone.
#[must_use]
pub fn date_value_to_zoned(value: DateValue) -> DateTime<Tz> {
    value.to_utc().with_timezone(&chrono_tz::UTC)
}

/// Returns the same instant as [`date_value_to_zoned`], displayed in `zone`.
#[must_use]
pub fn date_value_to_zoned_in(value: DateValue, zone: Tz) -> DateTime<Tz> {
    value.to_utc().with_timezone(&zone)
}

/// ## Summary
/// Returns the wall-clock fields of `date_time` as seen in `target`.
///
/// The instant is first shifted into `target`; the result always carries a
/// time of day, even at midnight. Sub-second precision is dropped.
#[must_use]
pub fn zoned_to_date_value<Z: TimeZone>(date_time: &DateTime<Z>, target: Tz) -> DateValue {
    DateValue::instant(date_time.with_timezone(&target).naive_local())
}
