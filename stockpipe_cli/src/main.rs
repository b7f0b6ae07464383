use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use stockpipe_lib::{Config, Pipeline, QuoteClient, TableRef, WarehouseClient};

#[derive(Parser)]
#[command(name = "stockpipe")]
#[command(about = "Append one ticker's daily OHLCV bar to a warehouse table on a schedule")]
struct Cli {
    /// Ticker symbol to fetch
    #[arg(long, default_value = "MSFT")]
    ticker: String,

    /// Warehouse dataset id
    #[arg(long, default_value = "market_data")]
    dataset: String,

    /// Warehouse table id
    #[arg(long, default_value = "daily_bars")]
    table: String,

    /// Seconds between pipeline cycles
    #[arg(long, default_value_t = 60)]
    interval_secs: u64,

    /// Run a single cycle and exit
    #[arg(long)]
    once: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("stockpipe_lib=info".parse().unwrap())
                .add_directive("stockpipe_cli=info".parse().unwrap()),
        )
        .with_target(false)
        .init();

    let cli = Cli::parse();

    let config = Config::from_env();
    let token = config
        .load_token()
        .context("loading warehouse credentials")?;

    let quotes = QuoteClient::new()?;
    let warehouse = WarehouseClient::new(token)?;
    let dest = TableRef::new(&config.project_id, &cli.dataset, &cli.table);
    let pipeline = Pipeline::new(quotes, warehouse, cli.ticker.clone(), dest);

    if cli.once {
        let rows = pipeline.run_once().await?;
        tracing::info!("Appended {} row(s), exiting", rows);
        return Ok(());
    }

    // Loop mode is meant for unattended operation: a failed cycle is
    // logged and the next tick runs regardless.
    let mut interval = tokio::time::interval(Duration::from_secs(cli.interval_secs));
    interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
    loop {
        tokio::select! {
            _ = interval.tick() => {
                if let Err(e) = pipeline.run_once().await {
                    tracing::error!("An error occurred: {e}");
                }
                tracing::info!("Waiting {}s until the next cycle...", cli.interval_secs);
            }
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("Shutdown requested, exiting");
                break;
            }
        }
    }

    Ok(())
}
