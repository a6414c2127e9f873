//! # Catholic SE
//!
//! Stand-in host for the Catholic SE sensors: polls the three daily sources
//! and prints every sensor's state as one JSON line per poll on stdout.
//! Logs go to stderr.
//!
//! ## Usage
//!
//! ```sh
//! catholic_se --once
//! RUST_LOG=catholic_se=debug catholic_se -c ./catholic_se.yaml
//! ```
//!
//! ## Architecture
//!
//! 1. **Load**: CLI arguments and the optional YAML settings file
//! 2. **Poll**: [`Integration::update`] refreshes the caches and renders
//! 3. **Output**: the states are written to stdout as JSON
//! 4. **Wait**: sleep for the poll interval, or exit with `--once`

use catholic_se::outputs::json;
use catholic_se::{Integration, Settings};
use chrono::{Local, Utc};
use clap::Parser;
use std::error::Error;
use tracing::{debug, error, info, instrument};
use tracing_subscriber::{EnvFilter, fmt as tfmt};

mod cli;

use cli::Cli;

#[tokio::main]
#[instrument]
async fn main() -> Result<(), Box<dyn Error>> {
    // --- Tracing init ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_writer(std::io::stderr)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    info!("catholic_se starting up");

    let args = Cli::parse();
    debug!(?args.config, args.once, ?args.date, "Parsed CLI arguments");

    let settings = Settings::load(args.config.as_deref())?;
    let mut integration = Integration::new(settings)?;
    let poll_interval = integration.settings().poll_interval();
    info!(
        sensors = integration.sensors().len(),
        poll_interval_secs = poll_interval.as_secs(),
        "Integration ready"
    );

    loop {
        let today = args.date.unwrap_or_else(|| Local::now().date_naive());
        let start_time = std::time::Instant::now();

        let states = integration.update(today).await;
        let mut stdout = std::io::stdout().lock();
        if let Err(e) = json::write_states(&mut stdout, today, Utc::now(), &states) {
            error!(error = %e, "Failed to write sensor states");
            return Err(e.into());
        }
        drop(stdout);

        info!(
            %today,
            elapsed_ms = start_time.elapsed().as_millis() as u64,
            "Poll finished"
        );

        if args.once {
            break;
        }

        tokio::select! {
            _ = tokio::time::sleep(poll_interval) => {}
            _ = tokio::signal::ctrl_c() => {
                info!("Interrupted; shutting down");
                break;
            }
        }
    }

    Ok(())
}
