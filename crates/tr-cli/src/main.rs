use std::io::{self, Cursor};

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use tr_cli::commands::report::{self, ReportOptions};
use tr_cli::{Cli, Config};

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing with verbose flag support
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::from_default_env()
    };
    // Logs go to stderr so they never mix with the report
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();

    let config = Config::load_from(cli.config.as_deref()).context("failed to load configuration")?;
    tracing::debug!(?config, "loaded configuration");

    let options = ReportOptions::from_cli(&cli, &config);
    let mut stdout = io::stdout().lock();

    match &cli.input {
        Some(text) => report::run(Cursor::new(text.as_bytes()), &mut stdout, &options)?,
        None => report::run(io::stdin().lock(), &mut stdout, &options)
            .context("failed to read standard input")?,
    };

    Ok(())
}
