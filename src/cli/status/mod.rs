//! Status command - polls health endpoints and prints one line per service

use std::time::Duration;

use clap::Args;
use tokio::signal;

use crate::config::AppConfig;
use crate::infrastructure::health_poller::HealthPoller;

/// Arguments for the status command
#[derive(Args, Clone, Debug)]
pub struct StatusArgs {
    /// Keep polling until interrupted
    #[arg(long)]
    pub watch: bool,

    /// Poll interval in seconds (overrides config)
    #[arg(long)]
    pub interval: Option<u64>,
}

/// Run the status command
pub async fn run(args: StatusArgs) -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = AppConfig::load()?;
    let mut poller = HealthPoller::from_settings(&config.health)?;

    print_lines(&poller.render());
    poller.poll_once().await;
    print_lines(&poller.render());

    if !args.watch {
        return Ok(());
    }

    let secs = args.interval.unwrap_or(config.health.interval_secs).max(1);
    let mut ticker = tokio::time::interval(Duration::from_secs(secs));
    // First tick completes immediately
    ticker.tick().await;

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                poller.poll_once().await;
                print_lines(&poller.render());
            }
            _ = signal::ctrl_c() => break,
        }
    }

    Ok(())
}

fn print_lines(lines: &[String]) {
    for line in lines {
        println!("{}", line);
    }
    println!();
}
