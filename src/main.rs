use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use tokio::time::{self, MissedTickBehavior};
use tracing::error;

use specular::cli::Args;
use specular::logging;
use specular::sync::run_sync;

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    args.validate()?;

    // Keep the guard alive so buffered file output is flushed on exit
    let _guard = logging::init(args.log.as_deref())?;
    let options = args.sync_options();

    let minutes = match args.interval {
        Some(minutes) => minutes,
        None => {
            run_sync(&args.source, &args.replica, options).await?;
            return Ok(());
        }
    };

    // First run fires immediately, then once per interval. Overlong runs
    // delay the next tick instead of stacking.
    let mut ticker = time::interval(Duration::from_secs_f64(minutes * 60.0));
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    loop {
        ticker.tick().await;
        if let Err(err) = run_sync(&args.source, &args.replica, options).await {
            error!("Synchronization run failed: {err:#}");
        }
    }
}
