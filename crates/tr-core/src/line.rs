//! Log line grammar.
//!
//! A log line looks like
//!
//! ```text
//! 2019-08-16 7:10-8:10, 9:00-9:10 (15 min lunch) free-form description
//! ```
//!
//! and is read left to right by a small cursor-based scanner: a date token,
//! a single space, one or more comma-separated intervals, and an optional
//! parenthesized pause annotation. Only the prefix is checked; anything after
//! the last recognized part is description and ignored.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::time::TimeOfDay;

/// Reasons a line was not counted.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// The line does not start with a `yyyy-mm-dd` token.
    #[error("expected a yyyy-mm-dd date at offset {offset}")]
    MissingDate { offset: usize },

    /// The date is not followed by a single space.
    #[error("expected a space after the date at offset {offset}")]
    MissingSpace { offset: usize },

    /// No `H:M-H:M` interval where one is required.
    #[error("expected a time interval at offset {offset}")]
    MissingInterval { offset: usize },

    /// A `,` separator with no interval after it.
    #[error("separator at offset {offset} is not followed by an interval")]
    DanglingSeparator { offset: usize },

    /// Two intervals written back to back without a `,`.
    #[error("interval at offset {offset} is not separated by a comma")]
    UnseparatedInterval { offset: usize },

    /// A time token that is not `H:M` with one or two digits per part.
    ///
    /// Comes from [`crate::to_minutes`]; the scanner backtracks on bad
    /// tokens instead, so a line rejects them as a missing interval.
    #[error("invalid time of day: {token:?}")]
    InvalidTime { token: String },

    /// The pause does not fit in the minute counter.
    #[error("pause of {digits} minutes is out of range")]
    PauseOutOfRange { digits: String },
}

impl ParseError {
    /// Whether the line had the expected shape but its values could not be
    /// converted.
    pub const fn is_conversion_failure(&self) -> bool {
        matches!(
            self,
            Self::DanglingSeparator { .. }
                | Self::UnseparatedInterval { .. }
                | Self::InvalidTime { .. }
                | Self::PauseOutOfRange { .. }
        )
    }
}

/// How the pause annotation is read.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PausePolicy {
    /// Only the leading `<N> min` counts; later clauses are ignored.
    #[default]
    First,
    /// Every `<N> min` clause inside the annotation's own parentheses is
    /// added up.
    Sum,
}

/// A worked span within one line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Interval {
    pub start: TimeOfDay,
    pub stop: TimeOfDay,
}

impl Interval {
    /// Stop minus start. Negative when the stop precedes the start.
    pub fn minutes(&self) -> i64 {
        self.stop.minutes() - self.start.minutes()
    }
}

/// The structured part of a successfully parsed line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogLine {
    /// Date token as written, e.g. `2019-04-09`.
    pub date: String,
    pub intervals: Vec<Interval>,
    /// Pause in minutes, `None` when the line has no annotation.
    pub pause: Option<u32>,
}

impl LogLine {
    /// Sum of all interval durations, before the pause is taken off.
    pub fn worked_minutes(&self) -> i64 {
        self.intervals.iter().map(Interval::minutes).sum()
    }

    pub fn pause_minutes(&self) -> i64 {
        self.pause.map_or(0, i64::from)
    }

    /// Worked minutes minus the pause. Not clamped.
    pub fn net_minutes(&self) -> i64 {
        self.worked_minutes() - self.pause_minutes()
    }

    /// The date token as a calendar date, if it names one.
    ///
    /// The grammar only checks the digit shape, so `2019-13-45` parses as a
    /// line but has no calendar date.
    pub fn calendar_date(&self) -> Option<NaiveDate> {
        NaiveDate::parse_from_str(&self.date, "%Y-%m-%d").ok()
    }
}

/// Result of parsing one line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseOutcome {
    Parsed { line: LogLine, net_minutes: i64 },
    Unparsed { line: String, reason: ParseError },
}

impl ParseOutcome {
    pub const fn net_minutes(&self) -> Option<i64> {
        match self {
            Self::Parsed { net_minutes, .. } => Some(*net_minutes),
            Self::Unparsed { .. } => None,
        }
    }
}

/// Parses log lines under a fixed pause policy.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LineParser {
    policy: PausePolicy,
}

impl LineParser {
    pub const fn new(policy: PausePolicy) -> Self {
        Self { policy }
    }

    /// Parses a single line. Never panics; failures come back as
    /// [`ParseOutcome::Unparsed`].
    pub fn parse(&self, line: &str) -> ParseOutcome {
        match self.parse_log_line(line) {
            Ok(parsed) => {
                let net_minutes = parsed.net_minutes();
                ParseOutcome::Parsed {
                    line: parsed,
                    net_minutes,
                }
            }
            Err(reason) => ParseOutcome::Unparsed {
                line: line.to_string(),
                reason,
            },
        }
    }

    /// Parses a single line into its structured form.
    pub fn parse_log_line(&self, line: &str) -> Result<LogLine, ParseError> {
        let mut cursor = Cursor::new(line);

        let date = cursor.date()?;
        if !cursor.eat(b' ') {
            return Err(ParseError::MissingSpace {
                offset: cursor.pos,
            });
        }
        let intervals = cursor.intervals()?;
        let pause = match cursor.annotation() {
            Some(body) => Some(pause_from_annotation(body, self.policy)?),
            None => None,
        };

        Ok(LogLine {
            date: date.to_string(),
            intervals,
            pause,
        })
    }
}

/// Parses a line with the default pause policy.
pub fn parse_line(line: &str) -> ParseOutcome {
    LineParser::default().parse(line)
}

/// Byte cursor over a line. All tokens it recognizes are ASCII, so every
/// position it stops at is a char boundary.
#[derive(Debug, Clone, Copy)]
struct Cursor<'a> {
    text: &'a str,
    pos: usize,
}

impl<'a> Cursor<'a> {
    const fn new(text: &'a str) -> Self {
        Self { text, pos: 0 }
    }

    fn rest(&self) -> &'a str {
        &self.text[self.pos..]
    }

    fn peek(&self) -> Option<u8> {
        self.text.as_bytes().get(self.pos).copied()
    }

    fn eat(&mut self, byte: u8) -> bool {
        if self.peek() == Some(byte) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    /// Consumes between one and `max` ASCII digits, as many as available.
    fn digits(&mut self, max: usize) -> Option<&'a str> {
        let len = self
            .rest()
            .bytes()
            .take(max)
            .take_while(u8::is_ascii_digit)
            .count();
        if len == 0 {
            return None;
        }
        let start = self.pos;
        self.pos += len;
        Some(&self.text[start..self.pos])
    }

    /// Consumes exactly `count` digits, or nothing.
    fn exact_digits(&mut self, count: usize) -> bool {
        let mut probe = *self;
        if probe.digits(count).is_some_and(|d| d.len() == count) {
            *self = probe;
            true
        } else {
            false
        }
    }

    /// `\d{4}-\d{2}-\d{2}` at the start of the line.
    fn date(&mut self) -> Result<&'a str, ParseError> {
        let start = self.pos;
        let shaped = self.exact_digits(4)
            && self.eat(b'-')
            && self.exact_digits(2)
            && self.eat(b'-')
            && self.exact_digits(2);
        if shaped {
            Ok(&self.text[start..self.pos])
        } else {
            Err(ParseError::MissingDate { offset: start })
        }
    }

    /// `H:M` with one or two digits per part, as read by
    /// `TimeOfDay`'s `FromStr`. Leaves the cursor untouched on failure.
    fn time(&mut self) -> Option<TimeOfDay> {
        let mut probe = *self;
        probe.digits(2)?;
        if !probe.eat(b':') {
            return None;
        }
        probe.digits(2)?;
        let time = self.text[self.pos..probe.pos].parse().ok()?;
        *self = probe;
        Some(time)
    }

    /// `H:M-H:M`. Leaves the cursor untouched on failure.
    fn interval(&mut self) -> Option<Interval> {
        let mut probe = *self;
        let start = probe.time()?;
        if !probe.eat(b'-') {
            return None;
        }
        let stop = probe.time()?;
        *self = probe;
        Some(Interval { start, stop })
    }

    fn at_interval(&self) -> bool {
        let mut probe = *self;
        probe.interval().is_some()
    }

    /// One or more intervals separated by `,` and optional spaces.
    fn intervals(&mut self) -> Result<Vec<Interval>, ParseError> {
        let first = self.interval().ok_or(ParseError::MissingInterval {
            offset: self.pos,
        })?;
        let mut intervals = vec![first];

        loop {
            let separator = self.pos;
            if self.eat(b',') {
                while self.eat(b' ') {}
                let next = self
                    .interval()
                    .ok_or(ParseError::DanglingSeparator { offset: separator })?;
                intervals.push(next);
            } else if self.at_interval() {
                return Err(ParseError::UnseparatedInterval { offset: separator });
            } else {
                return Ok(intervals);
            }
        }
    }

    /// ` (<digits> min ... )`, returning the text between `(` and the last
    /// `)` of the line. Leaves the cursor untouched when absent.
    fn annotation(&mut self) -> Option<&'a str> {
        let rest = self.rest();
        let inner = rest.strip_prefix(" (")?;
        let digits = inner.bytes().take_while(u8::is_ascii_digit).count();
        if digits == 0 {
            return None;
        }
        let after_min = inner[digits..].strip_prefix(" min")?;
        let close = after_min.rfind(')')?;
        let body_len = digits + " min".len() + close;
        self.pos += " (".len() + body_len + ")".len();
        Some(&inner[..body_len])
    }
}

/// Extracts the pause from an annotation body such as
/// `50 min lunch + 10 min call`.
///
/// The body runs to the last `)` of the line. Summing stops at the first `)`
/// so clauses in a later parenthetical or the description are not counted.
fn pause_from_annotation(body: &str, policy: PausePolicy) -> Result<u32, ParseError> {
    match policy {
        PausePolicy::First => min_clauses(body).next().map_or(Ok(0), parse_pause),
        PausePolicy::Sum => {
            let own = body.split_once(')').map_or(body, |(own, _)| own);
            min_clauses(own).try_fold(0_u32, |total, digits| {
                total
                    .checked_add(parse_pause(digits)?)
                    .ok_or_else(|| ParseError::PauseOutOfRange {
                        digits: digits.to_string(),
                    })
            })
        }
    }
}

fn parse_pause(digits: &str) -> Result<u32, ParseError> {
    digits.parse().map_err(|_| ParseError::PauseOutOfRange {
        digits: digits.to_string(),
    })
}

/// Every maximal digit run followed by ` min`, in order.
fn min_clauses(body: &str) -> impl Iterator<Item = &str> {
    let bytes = body.as_bytes();
    let mut pos = 0;
    std::iter::from_fn(move || {
        while pos < bytes.len() {
            if !bytes[pos].is_ascii_digit() {
                pos += 1;
                continue;
            }
            let start = pos;
            while pos < bytes.len() && bytes[pos].is_ascii_digit() {
                pos += 1;
            }
            if body[pos..].starts_with(" min") {
                return Some(&body[start..pos]);
            }
        }
        None
    })
}
