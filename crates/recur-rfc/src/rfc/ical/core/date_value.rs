//! Neutral date values exchanged with the recurrence engine.

use std::cmp::Ordering;
use std::fmt;

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime, NaiveTime, SubsecRound, Utc};

/// One occurrence as produced by the engine, always in UTC.
///
/// A value is either a whole calendar day or an instant with second
/// precision; there is no partially timed state. Calendar fields are valid
/// by construction.
///
/// ## Ordering
///
/// Values are placed on a timeline where a whole day sits at its own
/// midnight. Ties on that timeline sort the whole day first, so a whole-day
/// value sorts at-or-before every instant on the same day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DateValue {
    /// A calendar day with no time of day.
    WholeDay(NaiveDate),
    /// A UTC wall-clock instant.
    Instant(NaiveDateTime),
}

impl DateValue {
    /// Creates a whole-day value, or `None` if the fields are not a valid
    /// calendar date.
    #[must_use]
    pub fn date(year: i32, month: u32, day: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, day).map(Self::WholeDay)
    }

    /// Creates a timed value, or `None` if any field is out of range.
    #[must_use]
    pub fn date_time(
        year: i32,
        month: u32,
        day: u32,
        hour: u32,
        minute: u32,
        second: u32,
    ) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, day)?
            .and_hms_opt(hour, minute, second)
            .map(Self::Instant)
    }

    /// Creates a timed value, dropping any sub-second part.
    #[must_use]
    pub fn instant(date_time: NaiveDateTime) -> Self {
        Self::Instant(date_time.trunc_subsecs(0))
    }

    /// ## Summary
    /// Builds a value from a UTC instant in the requested shape.
    ///
    /// With `whole_day` set, only the UTC calendar day is kept.
    #[must_use]
    pub fn from_utc(instant: DateTime<Utc>, whole_day: bool) -> Self {
        let naive = instant.naive_utc();
        if whole_day {
            Self::WholeDay(naive.date())
        } else {
            Self::instant(naive)
        }
    }

    #[must_use]
    pub fn year(&self) -> i32 {
        self.date_part().year()
    }

    #[must_use]
    pub fn month(&self) -> u32 {
        self.date_part().month()
    }

    #[must_use]
    pub fn day(&self) -> u32 {
        self.date_part().day()
    }

    /// Returns the calendar day of this value.
    #[must_use]
    pub fn date_part(&self) -> NaiveDate {
        match self {
            Self::WholeDay(date) => *date,
            Self::Instant(date_time) => date_time.date(),
        }
    }

    /// Returns the time of day, or `None` for a whole-day value.
    #[must_use]
    pub fn time(&self) -> Option<NaiveTime> {
        match self {
            Self::WholeDay(_) => None,
            Self::Instant(date_time) => Some(date_time.time()),
        }
    }

    #[must_use]
    pub const fn is_whole_day(&self) -> bool {
        matches!(self, Self::WholeDay(_))
    }

    /// Position on the UTC timeline; whole days sit at midnight.
    #[must_use]
    pub fn timeline(&self) -> NaiveDateTime {
        match self {
            Self::WholeDay(date) => date.and_time(NaiveTime::MIN),
            Self::Instant(date_time) => *date_time,
        }
    }

    /// Returns the UTC instant of this value (midnight for a whole day).
    #[must_use]
    pub fn to_utc(&self) -> DateTime<Utc> {
        DateTime::<Utc>::from_naive_utc_and_offset(self.timeline(), Utc)
    }

    /// ## Summary
    /// Returns whether this value lies strictly before `other` on the
    /// timeline.
    ///
    /// This is the discard predicate used by every advance-to: a whole day
    /// does not precede an instant at its own midnight, and no instant on a
    /// day precedes that whole day.
    #[must_use]
    pub fn precedes(&self, other: &Self) -> bool {
        self.timeline() < other.timeline()
    }

    const fn rank(&self) -> u8 {
        match self {
            Self::WholeDay(_) => 0,
            Self::Instant(_) => 1,
        }
    }
}

impl Ord for DateValue {
    fn cmp(&self, other: &Self) -> Ordering {
        self.timeline()
            .cmp(&other.timeline())
            .then_with(|| self.rank().cmp(&other.rank()))
    }
}

impl PartialOrd for DateValue {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl From<NaiveDate> for DateValue {
    fn from(date: NaiveDate) -> Self {
        Self::WholeDay(date)
    }
}

impl fmt::Display for DateValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::WholeDay(date) => write!(f, "{}", date.format("%Y%m%d")),
            Self::Instant(date_time) => write!(f, "{}", date_time.format("%Y%m%dT%H%M%SZ")),
        }
    }
}
