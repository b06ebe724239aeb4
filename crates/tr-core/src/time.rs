//! Time-of-day tokens and duration formatting.

use std::fmt;
use std::str::FromStr;

use crate::line::ParseError;

/// A wall-clock time written as `H:M` in a log line.
///
/// Components are taken literally from one or two digits and are not
/// range-checked, so `25:70` is a valid value that simply converts to more
/// minutes than a day has.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimeOfDay {
    hour: u32,
    minute: u32,
}

impl TimeOfDay {
    pub const fn new(hour: u32, minute: u32) -> Self {
        Self { hour, minute }
    }

    /// Minutes since midnight.
    pub fn minutes(self) -> i64 {
        i64::from(self.hour) * 60 + i64::from(self.minute)
    }
}

impl fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{:02}", self.hour, self.minute)
    }
}

impl FromStr for TimeOfDay {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ParseError::InvalidTime {
            token: s.to_string(),
        };
        let (hour, minute) = s.split_once(':').ok_or_else(invalid)?;
        let hour = parse_component(hour).ok_or_else(invalid)?;
        let minute = parse_component(minute).ok_or_else(invalid)?;
        Ok(Self::new(hour, minute))
    }
}

/// Parses a one or two digit clock component.
fn parse_component(s: &str) -> Option<u32> {
    if s.is_empty() || s.len() > 2 || !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    s.parse().ok()
}

/// Converts an `H:MM` token to minutes since midnight.
pub fn to_minutes(token: &str) -> Result<i64, ParseError> {
    token.parse::<TimeOfDay>().map(TimeOfDay::minutes)
}

/// Formats a minute count as `h:mm`.
///
/// Uses floor division, so negative totals keep a non-negative minute part:
/// `-30` renders as `-1:30`.
pub fn format_duration(minutes: i64) -> String {
    let hours = minutes.div_euclid(60);
    let rest = minutes.rem_euclid(60);
    format!("{hours}:{rest:02}")
}
