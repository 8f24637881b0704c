mod options;
mod output;
mod progress;
mod selection;

use anyhow::{bail, Error as AnyError};
use clap::Parser;
use log::debug;
use opentopo::Client;
use options::{Cli, Command as CliCmd, LatLon};
use std::{sync::mpsc::RecvTimeoutError, time::Duration};
use viewshed::Calculator;

#[cfg(not(target_env = "msvc"))]
use tikv_jemallocator::Jemalloc;

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: Jemalloc = Jemalloc;

/// How often the progress bar is refreshed.
const POLL_INTERVAL: Duration = Duration::from_millis(250);

fn main() -> Result<(), AnyError> {
    let cli = Cli::parse();
    env_logger::init();

    let location = match cli.location {
        Some(LatLon(location)) => {
            selection::store(&cli.state, location)?;
            location
        }
        None => selection::load(&cli.state),
    };

    let client = Client::new(cli.api_key.as_str())?.dem_type(cli.dem);
    let (calculator, outcomes) = Calculator::new(client, cli.config());
    let job = calculator.submit(Some(location))?;

    let pb = progress::bar(format!("Viewshed from {},{}", location.y, location.x));
    let overlay = loop {
        match outcomes.recv_timeout(POLL_INTERVAL) {
            Ok(outcome) if !calculator.is_current(outcome.job_id) => {
                debug!("discarding outcome of stale job {}", outcome.job_id);
            }
            Ok(outcome) => {
                pb.finish_and_clear();
                break outcome.result?;
            }
            Err(RecvTimeoutError::Timeout) => pb.set_position(u64::from(job.progress())),
            Err(RecvTimeoutError::Disconnected) => {
                pb.abandon();
                bail!("calculation stopped without a result");
            }
        }
    };

    let mut stdout = std::io::stdout().lock();
    match cli.cmd {
        CliCmd::Summary => output::print_summary(&overlay, &mut stdout)?,
        CliCmd::Json => output::print_json(&overlay, &mut stdout)?,
        CliCmd::Csv => output::print_csv(&overlay, &mut stdout)?,
    };
    Ok(())
}
