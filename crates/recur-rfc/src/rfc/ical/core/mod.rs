//! Core models shared by the parser and the expander.

mod date_value;
mod parameter;
mod property;

pub use date_value::DateValue;
pub use parameter::Parameter;
pub use property::{ContentLine, RecurrenceProperty};
