//! Aggregation of parsed lines into a time report.

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::line::{LineParser, ParseOutcome, PausePolicy};
use crate::time::format_duration;

/// Which summary line to print.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SummaryStyle {
    /// `Total 2 days, 850 min, 425 mins/day, 14:10`
    #[default]
    Full,
    /// `Total 850 min, 14:10`
    Simple,
}

/// Per-line output showing how a line was read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EchoLine {
    Parsed { line: String, net_minutes: i64 },
    Unparsed { line: String },
}

impl fmt::Display for EchoLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Parsed { line, net_minutes } => write!(f, "{line} ({net_minutes} min)"),
            Self::Unparsed { line } => write!(f, "* {line}"),
        }
    }
}

/// Earliest and latest calendar dates seen among counted lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Period {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl Period {
    fn include(period: Option<Self>, date: NaiveDate) -> Self {
        match period {
            Some(Self { start, end }) => Self {
                start: start.min(date),
                end: end.max(date),
            },
            None => Self {
                start: date,
                end: date,
            },
        }
    }
}

/// Aggregated totals over a sequence of lines.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Report {
    /// Lines that parsed, whatever their net minutes.
    pub days_counted: u32,
    pub total_minutes: i64,
    pub unparsed_lines: u32,
    pub period: Option<Period>,
}

impl Report {
    /// Average minutes per counted day, floored. Zero when no day was
    /// counted.
    pub fn minutes_per_day(&self) -> i64 {
        if self.days_counted == 0 {
            return 0;
        }
        self.total_minutes.div_euclid(i64::from(self.days_counted))
    }

    pub fn formatted_duration(&self) -> String {
        format_duration(self.total_minutes)
    }

    pub fn summary(&self, style: SummaryStyle) -> String {
        match style {
            SummaryStyle::Full => format!(
                "Total {} days, {} min, {} mins/day, {}",
                self.days_counted,
                self.total_minutes,
                self.minutes_per_day(),
                self.formatted_duration()
            ),
            SummaryStyle::Simple => format!(
                "Total {} min, {}",
                self.total_minutes,
                self.formatted_duration()
            ),
        }
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.summary(SummaryStyle::Full))
    }
}

/// Folds lines into a [`Report`], one line at a time.
#[derive(Debug, Clone, Default)]
pub struct Aggregator {
    parser: LineParser,
    report: Report,
}

impl Aggregator {
    pub fn new(policy: PausePolicy) -> Self {
        Self {
            parser: LineParser::new(policy),
            report: Report::default(),
        }
    }

    /// Adds one line. A single trailing `\n` or `\r\n` is dropped first.
    ///
    /// Returns `None` for empty lines, which are not counted at all.
    pub fn push(&mut self, line: &str) -> Option<EchoLine> {
        let line = line.strip_suffix('\n').unwrap_or(line);
        let line = line.strip_suffix('\r').unwrap_or(line);
        if line.is_empty() {
            return None;
        }

        match self.parser.parse(line) {
            ParseOutcome::Parsed {
                line: parsed,
                net_minutes,
            } => {
                tracing::trace!(date = %parsed.date, net_minutes, "counted line");
                self.report.days_counted = self.report.days_counted.saturating_add(1);
                self.report.total_minutes = self.report.total_minutes.saturating_add(net_minutes);
                if let Some(date) = parsed.calendar_date() {
                    self.report.period = Some(Period::include(self.report.period, date));
                }
                Some(EchoLine::Parsed {
                    line: line.to_string(),
                    net_minutes,
                })
            }
            ParseOutcome::Unparsed { line, reason } => {
                tracing::debug!(
                    %reason,
                    %line,
                    conversion_failure = reason.is_conversion_failure(),
                    "skipping unparsed line"
                );
                self.report.unparsed_lines = self.report.unparsed_lines.saturating_add(1);
                Some(EchoLine::Unparsed { line })
            }
        }
    }

    pub fn finish(self) -> Report {
        self.report
    }
}

/// Aggregates a whole sequence of lines, discarding echo lines.
pub fn aggregate<I, S>(lines: I, policy: PausePolicy) -> Report
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut aggregator = Aggregator::new(policy);
    for line in lines {
        aggregator.push(line.as_ref());
    }
    aggregator.finish()
}
