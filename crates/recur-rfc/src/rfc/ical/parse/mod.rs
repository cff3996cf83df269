//! Recurrence-data parsing: content lines and RDATE/EXDATE values.

mod error;
mod lexer;
mod values;

pub use error::{ParseError, ParseErrorKind, ParseResult};
pub use lexer::{parse_content_line, split_lines};
pub use values::{DateSpec, parse_date, parse_date_list, parse_date_time, parse_time};
