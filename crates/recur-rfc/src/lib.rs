//! Recurrence engine side of the adapter.
//!
//! Parses RRULE/EXRULE/RDATE/EXDATE content lines, compiles them into an
//! `rrule::RRuleSet` and exposes the result as an ordered cursor of neutral
//! [`DateValue`](rfc::ical::core::DateValue)s in UTC.

pub mod error;
pub mod rfc;
