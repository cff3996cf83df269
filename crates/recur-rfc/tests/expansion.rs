//! End-to-end expansion through the public `recur_rfc` surface.

use chrono_tz::Tz;
use recur_rfc::error::RfcError;
use recur_rfc::rfc::ical::core::DateValue;
use recur_rfc::rfc::ical::expand::{CompileOptions, DateValueCursor, compile};

fn day(y: i32, m: u32, d: u32) -> DateValue {
    DateValue::date(y, m, d).expect("valid date")
}

fn at(y: i32, m: u32, d: u32, h: u32) -> DateValue {
    DateValue::date_time(y, m, d, h, 0, 0).expect("valid date-time")
}

#[test]
fn folded_weekly_rule_with_exceptions() {
    let rdata = "RRULE:FREQ=WEEKLY;\r\n BYDAY=MO,WE;COUNT=6\r\n\
                 EXDATE;VALUE=DATE:20240103\r\n\
                 RDATE;VALUE=DATE:20240106\r\n";
    let values: Vec<DateValue> = compile(rdata, day(2024, 1, 1), Tz::UTC, &CompileOptions::strict())
        .expect("compiles")
        .iter()
        .collect();
    assert_eq!(
        values,
        vec![
            day(2024, 1, 1),
            day(2024, 1, 6),
            day(2024, 1, 8),
            day(2024, 1, 10),
            day(2024, 1, 15),
            day(2024, 1, 17),
        ]
    );
}

#[test]
fn unbounded_rule_with_distant_advance() {
    let iterable = compile(
        "RRULE:FREQ=DAILY",
        at(2024, 1, 1, 9),
        Tz::UTC,
        &CompileOptions::default(),
    )
    .expect("compiles");

    let mut cursor = iterable.iter();
    cursor.advance_to(day(2030, 6, 15));
    assert_eq!(cursor.next_value(), Some(at(2030, 6, 15, 9)));
    assert_eq!(cursor.next_value(), Some(at(2030, 6, 16, 9)));

    let first_ten: Vec<DateValue> = iterable.iter().take(10).collect();
    assert_eq!(first_ten.first(), Some(&at(2024, 1, 1, 9)));
    assert_eq!(first_ten.last(), Some(&at(2024, 1, 10, 9)));
}

#[test]
fn rdates_merge_into_rule_order() {
    let rdata = "RRULE:FREQ=HOURLY;INTERVAL=7;COUNT=40\nRDATE:20240102T030000Z,20240101T020000Z";
    let values: Vec<DateValue> =
        compile(rdata, at(2024, 1, 1, 1), Tz::UTC, &CompileOptions::default())
            .expect("compiles")
            .iter()
            .collect();
    assert_eq!(values.len(), 42);
    assert!(values.windows(2).all(|pair| pair[0] <= pair[1]));
    assert_eq!(values.get(1), Some(&at(2024, 1, 1, 2)));
}

#[test]
fn long_hourly_series_streams() {
    let iterable = compile(
        "RRULE:FREQ=HOURLY",
        at(2024, 1, 1, 0),
        Tz::UTC,
        &CompileOptions::default(),
    )
    .expect("compiles");

    let mut cursor = iterable.iter();
    let mut previous = cursor.next_value().expect("first occurrence");
    let mut pulled = 1;
    while pulled < 20_000 {
        let value = cursor.next_value().expect("unbounded series");
        assert!(previous.precedes(&value));
        previous = value;
        pulled += 1;
    }
    assert!(!previous.is_whole_day());
    assert!(cursor.has_next());
}

#[test]
fn date_rdate_keeps_whole_day_shape_in_timed_series() {
    let rdata = "RRULE:FREQ=WEEKLY;COUNT=2\nRDATE;VALUE=DATE:20240105\nEXDATE;VALUE=DATE:20240106";
    let values: Vec<DateValue> =
        compile(rdata, at(2024, 1, 1, 9), Tz::Europe__Paris, &CompileOptions::strict())
            .expect("compiles")
            .iter()
            .collect();
    assert_eq!(values, vec![at(2024, 1, 1, 8), day(2024, 1, 5), at(2024, 1, 8, 8)]);
}

#[test]
fn strict_error_names_line() {
    let rdata = "RRULE:FREQ=DAILY;COUNT=2\nRDATE;TZID=\"Europe/Paris:20240105T090000";
    let err = compile(rdata, day(2024, 1, 1), Tz::UTC, &CompileOptions::strict()).unwrap_err();
    let RfcError::ParseError(err) = err else {
        panic!("expected a parse error, got {err:?}");
    };
    assert_eq!(err.line, 2);
    assert!(err.to_string().contains("unclosed quoted string"));
}
