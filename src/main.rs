use anyhow::Result;
use clap::Parser;
use dotenv::dotenv;
use std::sync::Arc;
use tracing::info;

use razor_bot::config::Config;
use razor_bot::logging;
use razor_bot::trading::TradeExecutor;

/// High-transaction pump executor: alternates buy and sell orders for one
/// token as fast as the API allows, until the session deadline.
#[derive(Parser, Debug)]
#[command(name = "razor")]
struct Args {
    /// Mint address of the token to trade
    token_address: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();
    let _guard = logging::init("razor.log")?;

    let args = Args::parse();

    let config = Arc::new(Config::load()?);
    info!("Configuration loaded successfully");

    let mut executor = TradeExecutor::new(config.clone())?;
    executor
        .run(&args.token_address, config.session_duration())
        .await;

    Ok(())
}
