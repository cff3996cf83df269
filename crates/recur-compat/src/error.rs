use thiserror::Error;

/// Adapter errors
#[derive(Error, Debug)]
pub enum CompatError {
    #[error(transparent)]
    Compile(#[from] recur_rfc::error::RfcError),

    #[error(transparent)]
    Core(#[from] recur_core::error::CoreError),

    #[error("No more occurrences")]
    Exhausted,
}

pub type CompatResult<T> = std::result::Result<T, CompatError>;
