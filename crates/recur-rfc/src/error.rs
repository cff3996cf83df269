use thiserror::Error;

use crate::rfc::ical::expand::ConversionError;
use crate::rfc::ical::parse::ParseError;

/// Rule compilation errors
#[derive(Error, Debug)]
pub enum RfcError {
    #[error("Parse error: {0}")]
    ParseError(#[from] ParseError),

    #[error("Timezone error: {0}")]
    ConversionError(#[from] ConversionError),
}

pub type RfcResult<T> = std::result::Result<T, RfcError>;
