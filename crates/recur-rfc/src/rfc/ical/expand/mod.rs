//! Rule compilation, zone handling and occurrence cursors.

mod compile;
mod cursor;
mod timezone;

pub use compile::{CompileOptions, RecurrenceIterable, compile};
pub use cursor::{DateValueCursor, FixedCursor, RecurrenceIterator};
pub use timezone::{ConversionError, TimeZoneResolver, localize, resolve_tzid};
