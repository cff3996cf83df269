//! Calendar-date and zoned date-time views over recurrence data.
//!
//! The engine in `recur-rfc` produces neutral [`DateValue`]s in UTC. This
//! crate turns them into `chrono::NaiveDate` or
//! `chrono::DateTime<chrono_tz::Tz>` sequences and builds those sequences
//! from raw RRULE/EXRULE/RDATE/EXDATE text.

pub mod convert;
pub mod error;
pub mod factory;
pub mod local_date;
pub mod zoned;

pub use error::{CompatError, CompatResult};
pub use factory::{
    create_local_date_iterable, create_local_date_iterable_with_options,
    create_local_date_iterator, create_local_date_iterator_with_options,
    create_zoned_date_time_iterable, create_zoned_date_time_iterable_with_options,
    create_zoned_date_time_iterator, create_zoned_date_time_iterator_with_options,
    local_date_iterator_from, resolve_default_zone, zoned_date_time_iterator_from,
};
pub use local_date::{LocalDateIterable, LocalDateIterator};
pub use recur_rfc::rfc::ical::core::DateValue;
pub use recur_rfc::rfc::ical::expand::{CompileOptions, DateValueCursor};
pub use zoned::{OutputZone, ZonedDateTimeIterable, ZonedDateTimeIterator};
