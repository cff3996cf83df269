//! Ordered occurrence cursors over a compiled rule set.

use std::collections::{BTreeSet, VecDeque};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use rrule::{RRuleSet, RRuleSetIter};

use crate::rfc::ical::core::DateValue;

/// Instants contributed by DATE-valued RDATE items.
pub(crate) type WholeDayInstants = Arc<BTreeSet<DateTime<Utc>>>;

/// A forward-only, stateful cursor over neutral date values.
///
/// Implementations yield values in non-decreasing order. There is no
/// removal operation.
pub trait DateValueCursor {
    /// Returns whether another value is available. Does not consume.
    fn has_next(&mut self) -> bool;

    /// Returns the next value, or `None` once the sequence is exhausted.
    fn next_value(&mut self) -> Option<DateValue>;

    /// ## Summary
    /// Discards every pending value that precedes `target`.
    ///
    /// After this call the next value is the first one at-or-after `target`.
    /// A target at or behind the current position is a no-op.
    fn advance_to(&mut self, target: DateValue);
}

/// Cursor over the occurrences of an `rrule::RRuleSet`.
///
/// Occurrences are pulled one at a time from the engine's own iterator, so
/// unbounded rules stay lazy and each value is generated once.
#[derive(Debug, Clone)]
pub struct RecurrenceIterator {
    source: RRuleSetIter,
    whole_day: bool,
    whole_days: WholeDayInstants,
    peeked: Option<DateValue>,
    last: Option<DateTime<Utc>>,
}

impl RecurrenceIterator {
    /// ## Summary
    /// Wraps an already-built rule set.
    ///
    /// With `whole_day` set, occurrences are reported as UTC calendar days.
    #[must_use]
    pub fn new(set: &RRuleSet, whole_day: bool) -> Self {
        Self::with_whole_days(set, whole_day, WholeDayInstants::default())
    }

    /// Like [`RecurrenceIterator::new`], but also reports the listed
    /// instants as whole days in a timed series.
    pub(crate) fn with_whole_days(
        set: &RRuleSet,
        whole_day: bool,
        whole_days: WholeDayInstants,
    ) -> Self {
        Self {
            source: set.into_iter(),
            whole_day,
            whole_days,
            peeked: None,
            last: None,
        }
    }

    /// Returns whether every occurrence is reported as a whole day.
    #[must_use]
    pub const fn is_whole_day(&self) -> bool {
        self.whole_day
    }

    /// Pulls the next distinct instant from the engine.
    ///
    /// The engine repeats an instant produced by both a rule and an RDATE.
    fn pull(&mut self) -> Option<DateValue> {
        loop {
            let instant = self.source.next()?.with_timezone(&Utc);
            if self.last.is_some_and(|last| instant <= last) {
                continue;
            }
            self.last = Some(instant);
            let whole_day = self.whole_day || self.whole_days.contains(&instant);
            return Some(DateValue::from_utc(instant, whole_day));
        }
    }

    fn peek(&mut self) -> Option<DateValue> {
        if self.peeked.is_none() {
            self.peeked = self.pull();
        }
        self.peeked
    }
}

impl DateValueCursor for RecurrenceIterator {
    fn has_next(&mut self) -> bool {
        self.peek().is_some()
    }

    fn next_value(&mut self) -> Option<DateValue> {
        self.peeked.take().or_else(|| self.pull())
    }

    fn advance_to(&mut self, target: DateValue) {
        let mut discarded = 0_usize;
        while self.peek().is_some_and(|value| value.precedes(&target)) {
            self.peeked = None;
            discarded += 1;
        }
        tracing::debug!(%target, discarded, "Advanced occurrence cursor");
    }
}

impl Iterator for RecurrenceIterator {
    type Item = DateValue;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_value()
    }
}

/// Cursor over a fixed list of values, sorted on construction.
///
/// Useful for occurrences computed elsewhere and for exercising the
/// adapters with mixed whole-day and timed values.
#[derive(Debug, Clone, Default)]
pub struct FixedCursor {
    values: VecDeque<DateValue>,
}

impl FixedCursor {
    #[must_use]
    pub fn new(values: impl IntoIterator<Item = DateValue>) -> Self {
        let mut values: Vec<DateValue> = values.into_iter().collect();
        values.sort();
        Self {
            values: values.into(),
        }
    }
}

impl DateValueCursor for FixedCursor {
    fn has_next(&mut self) -> bool {
        !self.values.is_empty()
    }

    fn next_value(&mut self) -> Option<DateValue> {
        self.values.pop_front()
    }

    fn advance_to(&mut self, target: DateValue) {
        while self.values.front().is_some_and(|value| value.precedes(&target)) {
            self.values.pop_front();
        }
    }
}

impl Iterator for FixedCursor {
    type Item = DateValue;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_value()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rrule::{RRule, Tz, Unvalidated};

    fn day(y: i32, m: u32, d: u32) -> DateValue {
        DateValue::date(y, m, d).expect("valid date")
    }

    fn at(y: i32, m: u32, d: u32, h: u32) -> DateValue {
        DateValue::date_time(y, m, d, h, 0, 0).expect("valid date-time")
    }

    fn daily_set(start: DateValue, rule: &str) -> RRuleSet {
        let dt_start = start.to_utc().with_timezone(&Tz::UTC);
        rule.parse::<RRule<Unvalidated>>()
            .expect("valid rule")
            .build(dt_start)
            .expect("valid rule set")
    }

    #[test]
    fn yields_every_occurrence_in_order() {
        let set = daily_set(at(2024, 1, 1, 9), "FREQ=DAILY;COUNT=7");
        let values: Vec<DateValue> = RecurrenceIterator::new(&set, false).collect();
        let expected: Vec<DateValue> = (1..=7).map(|d| at(2024, 1, d, 9)).collect();
        assert_eq!(values, expected);
    }

    #[test]
    fn whole_day_series_reports_days() {
        let set = daily_set(day(2024, 1, 30), "FREQ=DAILY;COUNT=3");
        let values: Vec<DateValue> = RecurrenceIterator::new(&set, true).collect();
        assert_eq!(values, vec![day(2024, 1, 30), day(2024, 1, 31), day(2024, 2, 1)]);
    }

    #[test]
    fn has_next_does_not_consume() {
        let set = daily_set(at(2024, 1, 1, 9), "FREQ=DAILY;COUNT=2");
        let mut cursor = RecurrenceIterator::new(&set, false);
        assert!(cursor.has_next());
        assert!(cursor.has_next());
        assert_eq!(cursor.next_value(), Some(at(2024, 1, 1, 9)));
        assert!(cursor.has_next());
        assert_eq!(cursor.next_value(), Some(at(2024, 1, 2, 9)));
        assert!(!cursor.has_next());
        assert_eq!(cursor.next_value(), None);
    }

    #[test]
    fn advance_before_first_pull_keeps_target_day() {
        let set = daily_set(day(2024, 1, 1), "FREQ=DAILY;COUNT=3");
        let mut cursor = RecurrenceIterator::new(&set, true);
        cursor.advance_to(day(2024, 1, 2));
        assert_eq!(cursor.next_value(), Some(day(2024, 1, 2)));
        assert_eq!(cursor.next_value(), Some(day(2024, 1, 3)));
        assert_eq!(cursor.next_value(), None);
    }

    #[test]
    fn advance_keeps_exact_instant() {
        let set = daily_set(at(2024, 1, 1, 9), "FREQ=DAILY");
        let mut cursor = RecurrenceIterator::new(&set, false);
        cursor.advance_to(at(2024, 3, 1, 9));
        assert_eq!(cursor.next_value(), Some(at(2024, 3, 1, 9)));
        assert_eq!(cursor.next_value(), Some(at(2024, 3, 2, 9)));
    }

    #[test]
    fn advance_between_occurrences_lands_on_next() {
        let set = daily_set(at(2024, 1, 1, 9), "FREQ=DAILY");
        let mut cursor = RecurrenceIterator::new(&set, false);
        assert_eq!(cursor.next_value(), Some(at(2024, 1, 1, 9)));
        cursor.advance_to(at(2024, 1, 5, 10));
        assert_eq!(cursor.next_value(), Some(at(2024, 1, 6, 9)));
    }

    #[test]
    fn advance_backwards_is_noop() {
        let set = daily_set(at(2024, 1, 1, 9), "FREQ=DAILY;COUNT=5");
        let mut cursor = RecurrenceIterator::new(&set, false);
        cursor.advance_to(at(2024, 1, 3, 0));
        assert_eq!(cursor.next_value(), Some(at(2024, 1, 3, 9)));
        cursor.advance_to(at(2024, 1, 1, 0));
        assert_eq!(cursor.next_value(), Some(at(2024, 1, 4, 9)));
    }

    #[test]
    fn advance_past_end_exhausts() {
        let set = daily_set(at(2024, 1, 1, 9), "FREQ=DAILY;COUNT=3");
        let mut cursor = RecurrenceIterator::new(&set, false);
        cursor.advance_to(day(2025, 1, 1));
        assert!(!cursor.has_next());
    }

    #[test]
    fn rdate_on_rule_occurrence_is_reported_once() {
        let dt_start = at(2024, 1, 1, 9).to_utc().with_timezone(&Tz::UTC);
        let set = daily_set(at(2024, 1, 1, 9), "FREQ=DAILY;COUNT=2").rdate(dt_start);
        let values: Vec<DateValue> = RecurrenceIterator::new(&set, false).collect();
        assert_eq!(values, vec![at(2024, 1, 1, 9), at(2024, 1, 2, 9)]);
    }

    #[test]
    fn listed_instants_are_whole_days_in_timed_series() {
        let midnight = day(2024, 1, 3).to_utc();
        let set = daily_set(at(2024, 1, 1, 9), "FREQ=DAILY;COUNT=3")
            .rdate(midnight.with_timezone(&Tz::UTC));
        let whole_days = WholeDayInstants::new([midnight].into_iter().collect());
        let values: Vec<DateValue> =
            RecurrenceIterator::with_whole_days(&set, false, whole_days).collect();
        assert_eq!(
            values,
            vec![at(2024, 1, 1, 9), at(2024, 1, 2, 9), day(2024, 1, 3), at(2024, 1, 3, 9)]
        );
    }

    #[test]
    fn fixed_cursor_sorts_and_advances() {
        let mut cursor = FixedCursor::new([at(2024, 1, 2, 9), day(2024, 1, 2), day(2024, 1, 1)]);
        cursor.advance_to(day(2024, 1, 2));
        assert_eq!(cursor.next_value(), Some(day(2024, 1, 2)));
        assert_eq!(cursor.next_value(), Some(at(2024, 1, 2, 9)));
        assert!(!cursor.has_next());
    }
}
