//! Command-line argument definitions.

use std::path::PathBuf;

use clap::Parser;

/// Time report for daily work logs.
///
/// Reads lines such as `2019-04-09 8:00-17:00 (50 min lunch) notes`, prints
/// each line with its worked minutes and finishes with a total.
#[derive(Debug, Parser)]
#[command(name = "timereport", version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output.
    #[arg(short, long)]
    pub verbose: bool,

    /// Path to config file.
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Print only the total minutes and hours, without the day count.
    #[arg(long)]
    pub simple: bool,

    /// Print the report as JSON instead of text.
    #[arg(long)]
    pub json: bool,

    /// Add up every `<N> min` clause in a pause annotation.
    #[arg(long)]
    pub sum_pauses: bool,

    /// Do not echo individual lines.
    #[arg(short, long)]
    pub quiet: bool,

    /// Log text to read instead of standard input.
    pub input: Option<String>,
}
