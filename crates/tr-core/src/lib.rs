//! Core logic for time reports.
//!
//! This crate contains:
//! - Line parsing: dates, worked intervals and pause annotations
//! - Aggregation: day counts, totals and averages over many lines
//! - Duration formatting in `h:mm` form

pub mod line;
pub mod report;
pub mod time;

pub use line::{Interval, LineParser, LogLine, ParseError, ParseOutcome, PausePolicy, parse_line};
pub use report::{Aggregator, EchoLine, Period, Report, SummaryStyle, aggregate};
pub use time::{TimeOfDay, format_duration, to_minutes};
