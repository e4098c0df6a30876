use anyhow::Result;
use clap::Parser;
use dotenv::dotenv;
use std::sync::Arc;
use tracing::info;

use razor_bot::config::Config;
use razor_bot::logging;
use razor_bot::trading::Liquidator;

/// Liquidate token balances: sells every non-zero SPL balance held by the
/// configured wallet, or a single token when one is given.
#[derive(Parser, Debug)]
#[command(name = "liquidate")]
struct Args {
    /// Sell only this mint instead of scanning the wallet
    token_address: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();
    let _guard = logging::init("liquidate.log")?;

    let args = Args::parse();

    let config = Arc::new(Config::load()?);
    info!("Configuration loaded successfully");

    let mut liquidator = Liquidator::new(config.clone())?;
    match args.token_address {
        Some(mint) => {
            info!("Selling specific token: {}", mint);
            liquidator.sell_token(&mint).await;
        }
        None => {
            info!("Selling all tokens in wallet: {}", config.wallet_address);
            liquidator.run().await?;
        }
    }

    Ok(())
}
