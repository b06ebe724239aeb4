//! Report command: reads log lines and prints the time report.
//!
//! Text output echoes every non-empty input line with its worked minutes (or a
//! `*` marker when it could not be read) and ends with one summary line. JSON
//! output prints only the totals.

use std::io::{BufRead, Write};

use anyhow::{Context, Result};
use serde::Serialize;
use tr_core::{Aggregator, PausePolicy, Report, SummaryStyle};

use crate::{Cli, Config};

/// Effective options for one report, after CLI flags are applied to config.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReportOptions {
    pub pause_policy: PausePolicy,
    pub summary: SummaryStyle,
    pub echo: bool,
    pub json: bool,
}

impl Default for ReportOptions {
    fn default() -> Self {
        Self::resolve(&Config::default(), false, false, false, false)
    }
}

impl ReportOptions {
    /// Flags only ever switch a setting on; they never undo a config value.
    #[expect(
        clippy::fn_params_excessive_bools,
        reason = "mirrors the independent CLI switches"
    )]
    pub const fn resolve(
        config: &Config,
        simple: bool,
        sum_pauses: bool,
        quiet: bool,
        json: bool,
    ) -> Self {
        Self {
            pause_policy: if sum_pauses {
                PausePolicy::Sum
            } else {
                config.pause_policy
            },
            summary: if simple {
                SummaryStyle::Simple
            } else {
                config.summary
            },
            echo: config.echo && !quiet,
            json,
        }
    }

    pub const fn from_cli(cli: &Cli, config: &Config) -> Self {
        Self::resolve(config, cli.simple, cli.sum_pauses, cli.quiet, cli.json)
    }
}

// ========== JSON Output ==========

/// JSON report structure.
#[derive(Debug, Serialize)]
pub struct JsonReport {
    pub days: u32,
    pub total_minutes: i64,
    pub minutes_per_day: i64,
    pub duration: String,
    pub unparsed_lines: u32,
    pub period: Option<JsonPeriod>,
}

#[derive(Debug, Serialize)]
pub struct JsonPeriod {
    pub start: String,
    pub end: String,
}

impl From<&Report> for JsonReport {
    fn from(report: &Report) -> Self {
        Self {
            days: report.days_counted,
            total_minutes: report.total_minutes,
            minutes_per_day: report.minutes_per_day(),
            duration: report.formatted_duration(),
            unparsed_lines: report.unparsed_lines,
            period: report.period.map(|period| JsonPeriod {
                start: period.start.format("%Y-%m-%d").to_string(),
                end: period.end.format("%Y-%m-%d").to_string(),
            }),
        }
    }
}

/// Formats report totals as JSON.
pub fn format_report_json(report: &Report) -> Result<String> {
    Ok(serde_json::to_string_pretty(&JsonReport::from(report))?)
}

// ========== Public Interface ==========

/// Runs the report over `reader`, writing echo lines and the summary to
/// `writer`.
pub fn run<R: BufRead, W: Write>(
    reader: R,
    writer: &mut W,
    options: &ReportOptions,
) -> Result<Report> {
    let mut aggregator = Aggregator::new(options.pause_policy);
    let echo = options.echo && !options.json;

    for (idx, line) in reader.lines().enumerate() {
        let line = line.with_context(|| format!("failed to read line {}", idx + 1))?;
        if let Some(echoed) = aggregator.push(&line) {
            if echo {
                writeln!(writer, "{echoed}")?;
            }
        }
    }

    let report = aggregator.finish();
    tracing::debug!(
        days = report.days_counted,
        total_minutes = report.total_minutes,
        unparsed = report.unparsed_lines,
        "report complete"
    );

    if options.json {
        writeln!(writer, "{}", format_report_json(&report)?)?;
    } else {
        writeln!(writer, "{}", report.summary(options.summary))?;
    }

    Ok(report)
}
