//! iCalendar recurrence handling (RFC 5545 §3.8.5).

pub mod core;
pub mod expand;
pub mod parse;
