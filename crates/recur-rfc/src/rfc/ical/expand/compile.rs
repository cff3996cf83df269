//! Compilation of recurrence data into an `rrule::RRuleSet`.

use std::collections::BTreeSet;
use std::sync::Arc;

use chrono::{DateTime, NaiveDateTime, NaiveTime, TimeZone, Utc};
use chrono_tz::Tz;
use recur_core::config::RecurrenceConfig;
use rrule::{RRule, RRuleSet, Unvalidated};

use super::cursor::{RecurrenceIterator, WholeDayInstants};
use super::timezone::{ConversionError, TimeZoneResolver, localize};
use crate::error::RfcResult;
use crate::rfc::ical::core::{ContentLine, DateValue, RecurrenceProperty};
use crate::rfc::ical::parse::{
    DateSpec, ParseError, ParseErrorKind, ParseResult, parse_content_line, parse_date_list,
    split_lines,
};

type EngineDateTime = DateTime<rrule::Tz>;

/// Options controlling compilation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CompileOptions {
    /// Fail on the first malformed line instead of skipping it.
    pub strict: bool,
}

impl CompileOptions {
    #[must_use]
    pub const fn strict() -> Self {
        Self { strict: true }
    }

    #[must_use]
    pub const fn lenient() -> Self {
        Self { strict: false }
    }

    #[must_use]
    pub const fn from_settings(config: &RecurrenceConfig) -> Self {
        Self {
            strict: config.strict,
        }
    }
}

/// A compiled rule set that hands out independent cursors.
///
/// The rule set is immutable and shared between every cursor created by
/// [`RecurrenceIterable::iter`].
#[derive(Debug, Clone)]
pub struct RecurrenceIterable {
    set: Arc<RRuleSet>,
    whole_day: bool,
    whole_days: WholeDayInstants,
}

impl RecurrenceIterable {
    /// Returns a fresh cursor positioned before the first occurrence.
    #[must_use]
    pub fn iter(&self) -> RecurrenceIterator {
        RecurrenceIterator::with_whole_days(
            &self.set,
            self.whole_day,
            Arc::clone(&self.whole_days),
        )
    }

    /// Returns whether every occurrence is reported as a whole day.
    #[must_use]
    pub const fn is_whole_day(&self) -> bool {
        self.whole_day
    }

    #[must_use]
    pub fn rule_set(&self) -> &RRuleSet {
        &self.set
    }
}

impl<'a> IntoIterator for &'a RecurrenceIterable {
    type Item = DateValue;
    type IntoIter = RecurrenceIterator;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// What one content line adds to the rule set.
enum LineContribution {
    RRule(RRule),
    ExRule(RRule),
    RDates(Vec<Placed>),
    ExDates(Vec<Placed>),
    Ignored,
}

/// One RDATE/EXDATE item on the engine timeline.
struct Placed {
    instant: EngineDateTime,
    /// Written in DATE form.
    whole_day: bool,
}

/// Per-compilation state shared by every line.
struct LineCompiler {
    dt_start: EngineDateTime,
    whole_day: bool,
    governing: Tz,
    resolver: TimeZoneResolver,
}

/// ## Summary
/// Compiles RRULE, EXRULE, RDATE and EXDATE lines into a restartable
/// occurrence sequence.
///
/// A whole-day `start` anchors the series at midnight UTC and yields whole
/// days. A timed `start` holds wall-clock fields in `governing`; the series
/// is expanded in that zone and yields UTC instants. Zone-less RDATE, EXDATE
/// and UNTIL values are read in `governing`. A DATE-valued RDATE in a timed
/// series still yields a whole day. DTSTART lines are ignored.
///
/// ## Errors
///
/// In strict mode, returns the first malformed line as a `ParseError`. In
/// lenient mode such lines are logged and skipped. Returns a
/// `ConversionError` if a timed `start` cannot be placed in `governing`.
pub fn compile(
    rdata: &str,
    start: DateValue,
    governing: Tz,
    options: &CompileOptions,
) -> RfcResult<RecurrenceIterable> {
    let whole_day = start.is_whole_day();
    let dt_start = match start {
        DateValue::WholeDay(_) => start.to_utc().with_timezone(&rrule::Tz::UTC),
        DateValue::Instant(wall_clock) => {
            localize(wall_clock, governing)?.with_timezone(&rrule::Tz::Tz(governing))
        }
    };

    let mut compiler = LineCompiler {
        dt_start,
        whole_day,
        governing,
        resolver: TimeZoneResolver::new(),
    };

    let mut set = RRuleSet::new(dt_start);
    let mut whole_days = BTreeSet::new();
    let mut skipped = 0_usize;
    for (line_num, text) in split_lines(rdata) {
        let contribution = match compiler.compile_line(&text, line_num) {
            Ok(contribution) => contribution,
            Err(err) if options.strict => return Err(err.with_content(text).into()),
            Err(err) => {
                tracing::warn!(line = line_num, error = %err, "Skipping malformed recurrence line");
                skipped += 1;
                continue;
            }
        };

        set = match contribution {
            LineContribution::RRule(rule) => set.rrule(rule),
            LineContribution::ExRule(rule) => set.exrule(rule),
            LineContribution::RDates(dates) => dates.into_iter().fold(set, |set, placed| {
                if placed.whole_day {
                    whole_days.insert(placed.instant.with_timezone(&Utc));
                }
                set.rdate(placed.instant)
            }),
            LineContribution::ExDates(dates) => dates
                .into_iter()
                .fold(set, |set, placed| set.exdate(placed.instant)),
            LineContribution::Ignored => set,
        };
    }

    tracing::debug!(
        %start,
        %governing,
        whole_day,
        whole_day_rdates = whole_days.len(),
        skipped,
        strict = options.strict,
        "Compiled recurrence data"
    );

    Ok(RecurrenceIterable {
        set: Arc::new(set),
        whole_day,
        whole_days: Arc::new(whole_days),
    })
}

impl LineCompiler {
    fn compile_line(&mut self, text: &str, line_num: usize) -> ParseResult<LineContribution> {
        let line = parse_content_line(text, line_num)?;
        let Some(property) = line.property() else {
            return Err(ParseError::new(ParseErrorKind::UnsupportedProperty, line_num, 1)
                .with_context(format!("`{}`", line.name)));
        };
        tracing::trace!(line = line_num, %property, "Compiling recurrence line");

        match property {
            RecurrenceProperty::RRule => self.rule(&line, line_num).map(LineContribution::RRule),
            RecurrenceProperty::ExRule => self.rule(&line, line_num).map(LineContribution::ExRule),
            RecurrenceProperty::RDate => self.dates(&line, line_num).map(LineContribution::RDates),
            RecurrenceProperty::ExDate => {
                self.dates(&line, line_num).map(LineContribution::ExDates)
            }
            RecurrenceProperty::DtStart => Ok(LineContribution::Ignored),
        }
    }

    fn rule(&self, line: &ContentLine, line_num: usize) -> ParseResult<RRule> {
        let invalid = |reason: String| {
            ParseError::new(ParseErrorKind::InvalidRule, line_num, line.value_offset + 1)
                .with_context(reason)
        };
        let mut rule = line
            .raw_value
            .parse::<RRule<Unvalidated>>()
            .map_err(|err| invalid(err.to_string()))?;

        // A DATE or floating UNTIL comes back in the system zone, which the
        // engine refuses next to a zoned DTSTART.
        let floating_until = rule
            .get_until()
            .filter(|until| matches!(until.timezone(), rrule::Tz::Local(_)))
            .map(DateTime::naive_local);
        if let Some(wall_clock) = floating_until {
            let until = self
                .anchor_until(wall_clock)
                .map_err(|err| invalid(err.to_string()))?;
            rule = rule.until(until);
        }

        rule.validate(self.dt_start)
            .map_err(|err| invalid(err.to_string()))
    }

    /// Pins a zone-less UNTIL to UTC: the day itself in a whole-day series,
    /// the governing wall clock otherwise.
    fn anchor_until(&self, wall_clock: NaiveDateTime) -> Result<EngineDateTime, ConversionError> {
        let instant = if self.whole_day {
            Utc.from_utc_datetime(&wall_clock)
        } else {
            localize(wall_clock, self.governing)?.with_timezone(&Utc)
        };
        Ok(instant.with_timezone(&rrule::Tz::UTC))
    }

    fn dates(&mut self, line: &ContentLine, line_num: usize) -> ParseResult<Vec<Placed>> {
        let column = line.value_offset + 1;
        parse_date_list(line, line_num)?
            .into_iter()
            .map(|spec| {
                self.place(spec).map_err(|err| {
                    let kind = match err {
                        ConversionError::UnknownTimezone(_) => ParseErrorKind::UnknownTimezone,
                        ConversionError::NonExistentTime(_) => ParseErrorKind::NonExistentTime,
                    };
                    ParseError::new(kind, line_num, column).with_context(err.to_string())
                })
            })
            .collect()
    }

    /// Places one RDATE/EXDATE item on the UTC timeline.
    ///
    /// A DATE item always lands on midnight UTC of its day.
    fn place(&mut self, spec: DateSpec) -> Result<Placed, ConversionError> {
        let whole_day = matches!(spec, DateSpec::Date(_));
        let instant = match spec {
            DateSpec::Date(date) => Utc.from_utc_datetime(&date.and_time(NaiveTime::MIN)),
            DateSpec::Utc(date_time) => Utc.from_utc_datetime(&date_time),
            DateSpec::Local { date_time, tzid } => self.local(date_time, tzid.as_deref())?,
        };
        Ok(Placed {
            instant: instant.with_timezone(&rrule::Tz::UTC),
            whole_day,
        })
    }

    fn local(
        &mut self,
        wall_clock: NaiveDateTime,
        tzid: Option<&str>,
    ) -> Result<DateTime<Utc>, ConversionError> {
        let tz = match tzid {
            Some(tzid) => self.resolver.resolve(tzid)?,
            None => self.governing,
        };
        Ok(localize(wall_clock, tz)?.with_timezone(&Utc))
    }
}
