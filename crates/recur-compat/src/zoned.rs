//! Zoned date-time view of an occurrence sequence.
//!
//! Occurrences are reported in UTC by default, whatever the governing zone.
//! [`OutputZone::Governing`] re-projects the same instants into the
//! governing zone instead.

use chrono::{DateTime, TimeZone};
use chrono_tz::Tz;
use recur_rfc::rfc::ical::expand::{DateValueCursor, RecurrenceIterable, RecurrenceIterator};

use crate::convert::{date_value_to_zoned, date_value_to_zoned_in, zoned_to_date_value};
use crate::error::{CompatError, CompatResult};

/// Zone used to label emitted date-times.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputZone {
    /// Label every occurrence UTC.
    #[default]
    Utc,
    /// Display every occurrence in the governing zone.
    Governing,
}

/// Sequence of occurrences as zone-labelled date-times.
///
/// A whole-day occurrence is reported as midnight UTC on its day. The
/// sequence is read-only.
#[derive(Debug, Clone)]
pub struct ZonedDateTimeIterator<C = RecurrenceIterator> {
    cursor: C,
    governing: Tz,
    output: OutputZone,
}

impl<C: DateValueCursor> ZonedDateTimeIterator<C> {
    #[must_use]
    pub const fn new(cursor: C, governing: Tz) -> Self {
        Self {
            cursor,
            governing,
            output: OutputZone::Utc,
        }
    }

    #[must_use]
    pub fn with_output_zone(mut self, output: OutputZone) -> Self {
        self.output = output;
        self
    }

    #[must_use]
    pub const fn governing_zone(&self) -> Tz {
        self.governing
    }

    /// Returns whether another date-time is available. Does not consume.
    pub fn has_next(&mut self) -> bool {
        self.cursor.has_next()
    }

    /// ## Summary
    /// Returns the next date-time.
    ///
    /// ## Errors
    /// Returns `CompatError::Exhausted` if no occurrence remains.
    pub fn try_next(&mut self) -> CompatResult<DateTime<Tz>> {
        self.next().ok_or(CompatError::Exhausted)
    }

    /// ## Summary
    /// Skips every occurrence strictly before the instant `target`.
    ///
    /// The target is compared in UTC, the engine's own timeline. An
    /// occurrence at exactly `target` is kept, and so is a whole-day
    /// occurrence when `target` is midnight UTC on that day.
    pub fn advance_to<Z: TimeZone>(&mut self, target: &DateTime<Z>) {
        self.cursor
            .advance_to(zoned_to_date_value(target, chrono_tz::UTC));
    }

    #[must_use]
    pub fn into_inner(self) -> C {
        self.cursor
    }
}

impl<C: DateValueCursor> Iterator for ZonedDateTimeIterator<C> {
    type Item = DateTime<Tz>;

    fn next(&mut self) -> Option<Self::Item> {
        let value = self.cursor.next_value()?;
        Some(match self.output {
            OutputZone::Utc => date_value_to_zoned(value),
            OutputZone::Governing => date_value_to_zoned_in(value, self.governing),
        })
    }
}

/// Restartable zoned sequence over one compiled rule set.
#[derive(Debug, Clone)]
pub struct ZonedDateTimeIterable {
    inner: RecurrenceIterable,
    governing: Tz,
    output: OutputZone,
}

impl ZonedDateTimeIterable {
    #[must_use]
    pub const fn new(inner: RecurrenceIterable, governing: Tz) -> Self {
        Self {
            inner,
            governing,
            output: OutputZone::Utc,
        }
    }

    /// Sets the output zone for every sequence created afterwards.
    #[must_use]
    pub fn with_output_zone(mut self, output: OutputZone) -> Self {
        self.output = output;
        self
    }

    /// Returns a fresh sequence positioned before the first occurrence.
    #[must_use]
    pub fn iter(&self) -> ZonedDateTimeIterator {
        ZonedDateTimeIterator::new(self.inner.iter(), self.governing).with_output_zone(self.output)
    }
}

impl<'a> IntoIterator for &'a ZonedDateTimeIterable {
    type Item = DateTime<Tz>;
    type IntoIter = ZonedDateTimeIterator;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
