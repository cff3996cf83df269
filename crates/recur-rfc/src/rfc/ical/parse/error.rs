//! Recurrence-data parsing error types.

use std::fmt;

/// Result type for content-line parsing.
pub type ParseResult<T> = Result<T, ParseError>;

/// A rejected content line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError {
    /// Kind of error.
    pub kind: ParseErrorKind,
    /// Line number of the offending content line (1-based).
    pub line: usize,
    /// Column where the error was detected (1-based).
    pub column: usize,
    /// Additional context about the error.
    pub context: Option<String>,
    /// The offending content line as written.
    pub content: Option<String>,
}

impl ParseError {
    /// Creates a new parse error.
    #[must_use]
    pub fn new(kind: ParseErrorKind, line: usize, column: usize) -> Self {
        Self {
            kind,
            line,
            column,
            context: None,
            content: None,
        }
    }

    /// Adds context to this error.
    #[must_use]
    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }

    /// Attaches the offending content line.
    #[must_use]
    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        self.content = Some(content.into());
        self
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} at line {}, column {}", self.kind, self.line, self.column)?;
        if let Some(ref ctx) = self.context {
            write!(f, ": {ctx}")?;
        }
        if let Some(ref content) = self.content {
            write!(f, " in `{content}`")?;
        }
        Ok(())
    }
}

impl std::error::Error for ParseError {}

/// Kinds of parse errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseErrorKind {
    /// Missing property name.
    MissingPropertyName,
    /// Invalid property name character.
    InvalidPropertyName,
    /// Missing colon separator.
    MissingColon,
    /// Invalid parameter format.
    InvalidParameter,
    /// Unclosed quoted string.
    UnclosedQuote,
    /// Invalid date format.
    InvalidDate,
    /// Invalid time format.
    InvalidTime,
    /// Invalid date-time format.
    InvalidDateTime,
    /// Invalid period format.
    InvalidPeriod,
    /// RRULE or EXRULE rejected by the recurrence engine.
    InvalidRule,
    /// TZID that does not resolve to a known zone.
    UnknownTimezone,
    /// Local time that falls in a DST gap.
    NonExistentTime,
    /// Property other than RRULE, EXRULE, RDATE, EXDATE or DTSTART.
    UnsupportedProperty,
}

impl fmt::Display for ParseErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingPropertyName => write!(f, "missing property name"),
            Self::InvalidPropertyName => write!(f, "invalid property name"),
            Self::MissingColon => write!(f, "missing colon separator"),
            Self::InvalidParameter => write!(f, "invalid parameter format"),
            Self::UnclosedQuote => write!(f, "unclosed quoted string"),
            Self::InvalidDate => write!(f, "invalid date"),
            Self::InvalidTime => write!(f, "invalid time"),
            Self::InvalidDateTime => write!(f, "invalid date-time"),
            Self::InvalidPeriod => write!(f, "invalid period"),
            Self::InvalidRule => write!(f, "invalid recurrence rule"),
            Self::UnknownTimezone => write!(f, "unknown timezone"),
            Self::NonExistentTime => write!(f, "non-existent local time"),
            Self::UnsupportedProperty => write!(f, "unsupported content line"),
        }
    }
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
