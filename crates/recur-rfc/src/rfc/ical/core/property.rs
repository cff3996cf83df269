//! Content lines accepted in recurrence data (RFC 5545 §3.1, §3.8.5).

use std::fmt;

use super::Parameter;

/// A lexed content line: `name *(";" param) ":" value`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentLine {
    /// Property name (normalized to uppercase).
    pub name: String,
    /// Parameters in order of appearance.
    pub params: Vec<Parameter>,
    /// Raw value string after unfolding.
    pub raw_value: String,
    /// Byte offset of the value within the unfolded line.
    pub value_offset: usize,
}

impl ContentLine {
    /// Returns the value of the first parameter with the given name.
    #[must_use]
    pub fn get_param_value(&self, name: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|p| p.name.eq_ignore_ascii_case(name))
            .and_then(Parameter::value)
    }

    /// Returns the TZID parameter if present.
    #[must_use]
    pub fn tzid(&self) -> Option<&str> {
        self.get_param_value("TZID")
    }

    /// Returns the VALUE parameter if present.
    #[must_use]
    pub fn value_type(&self) -> Option<&str> {
        self.get_param_value("VALUE")
    }

    /// Classifies the line by property name.
    #[must_use]
    pub fn property(&self) -> Option<RecurrenceProperty> {
        RecurrenceProperty::from_name(&self.name)
    }
}

/// Properties understood in recurrence data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecurrenceProperty {
    RRule,
    ExRule,
    RDate,
    ExDate,
    /// Accepted and ignored; the series start is supplied separately.
    DtStart,
}

impl RecurrenceProperty {
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_uppercase().as_str() {
            "RRULE" => Some(Self::RRule),
            "EXRULE" => Some(Self::ExRule),
            "RDATE" => Some(Self::RDate),
            "EXDATE" => Some(Self::ExDate),
            "DTSTART" => Some(Self::DtStart),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::RRule => "RRULE",
            Self::ExRule => "EXRULE",
            Self::RDate => "RDATE",
            Self::ExDate => "EXDATE",
            Self::DtStart => "DTSTART",
        }
    }
}

impl fmt::Display for RecurrenceProperty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
