//! Calendar-date view of an occurrence sequence.

use chrono::NaiveDate;
use recur_rfc::rfc::ical::expand::{DateValueCursor, RecurrenceIterable, RecurrenceIterator};

use crate::convert::{date_value_to_local_date, local_date_to_date_value};
use crate::error::{CompatError, CompatResult};

/// Sequence of occurrences as plain calendar dates.
///
/// Occurrences that carry a time of day are reported by their UTC date.
/// The sequence is read-only.
#[derive(Debug, Clone)]
pub struct LocalDateIterator<C = RecurrenceIterator> {
    cursor: C,
}

impl<C: DateValueCursor> LocalDateIterator<C> {
    #[must_use]
    pub const fn new(cursor: C) -> Self {
        Self { cursor }
    }

    /// Returns whether another date is available. Does not consume.
    pub fn has_next(&mut self) -> bool {
        self.cursor.has_next()
    }

    /// ## Summary
    /// Returns the next date.
    ///
    /// ## Errors
    /// Returns `CompatError::Exhausted` if no occurrence remains.
    pub fn try_next(&mut self) -> CompatResult<NaiveDate> {
        self.next().ok_or(CompatError::Exhausted)
    }

    /// ## Summary
    /// Skips every occurrence before `target`.
    ///
    /// An occurrence on `target` itself, timed or not, is kept.
    pub fn advance_to(&mut self, target: NaiveDate) {
        self.cursor.advance_to(local_date_to_date_value(target));
    }

    /// Returns the wrapped cursor.
    #[must_use]
    pub fn into_inner(self) -> C {
        self.cursor
    }
}

impl<C: DateValueCursor> Iterator for LocalDateIterator<C> {
    type Item = NaiveDate;

    fn next(&mut self) -> Option<Self::Item> {
        self.cursor.next_value().map(date_value_to_local_date)
    }
}

/// Restartable calendar-date sequence over one compiled rule set.
#[derive(Debug, Clone)]
pub struct LocalDateIterable {
    inner: RecurrenceIterable,
}

impl LocalDateIterable {
    #[must_use]
    pub const fn new(inner: RecurrenceIterable) -> Self {
        Self { inner }
    }

    /// Returns a fresh sequence positioned before the first occurrence.
    #[must_use]
    pub fn iter(&self) -> LocalDateIterator {
        LocalDateIterator::new(self.inner.iter())
    }
}

impl<'a> IntoIterator for &'a LocalDateIterable {
    type Item = NaiveDate;
    type IntoIter = LocalDateIterator;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use recur_rfc::rfc::ical::core::DateValue;
    use recur_rfc::rfc::ical::expand::FixedCursor;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
    }

    fn at(y: i32, m: u32, d: u32, h: u32) -> DateValue {
        DateValue::date_time(y, m, d, h, 0, 0).expect("valid date-time")
    }

    #[test]
    fn advance_keeps_timed_occurrence_on_target_day() {
        let cursor = FixedCursor::new([at(2024, 1, 1, 9), at(2024, 1, 2, 0), at(2024, 1, 2, 9)]);
        let mut dates = LocalDateIterator::new(cursor);
        dates.advance_to(date(2024, 1, 2));
        assert_eq!(dates.next(), Some(date(2024, 1, 2)));
        assert_eq!(dates.next(), Some(date(2024, 1, 2)));
        assert_eq!(dates.next(), None);
    }

    #[test]
    fn try_next_signals_exhaustion() {
        let cursor = FixedCursor::new([DateValue::WholeDay(date(2024, 5, 1))]);
        let mut dates = LocalDateIterator::new(cursor);
        assert!(dates.has_next());
        assert_eq!(dates.try_next().expect("one value"), date(2024, 5, 1));
        assert!(!dates.has_next());
        assert!(matches!(dates.try_next(), Err(CompatError::Exhausted)));
    }
}
