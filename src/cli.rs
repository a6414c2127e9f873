//! Command-line interface definitions for the Catholic SE sensor runner.
//!
//! All arguments are optional: without a config file the built-in upstream
//! URLs and timeouts are used.

use chrono::NaiveDate;
use clap::Parser;
use std::path::PathBuf;

/// Command-line arguments for the sensor runner.
///
/// # Examples
///
/// ```sh
/// # Poll forever with the default settings
/// catholic_se
///
/// # One poll with a custom config file
/// catholic_se -c ./catholic_se.yaml --once
///
/// # Render a given day once
/// catholic_se --once --date 2026-02-13
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Optional path to a YAML settings file
    #[arg(short, long, env = "CATHOLIC_SE_CONFIG")]
    pub config: Option<PathBuf>,

    /// Poll once, print the sensor states and exit
    #[arg(long)]
    pub once: bool,

    /// Use this date (YYYY-MM-DD) instead of today
    #[arg(long)]
    pub date: Option<NaiveDate>,
}
