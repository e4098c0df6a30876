use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use tracing::{error, info, warn};

use crate::api::pumpportal::{PumpPortalClient, SellAmount, TradeRequest};
use crate::config::Config;
use crate::solana::{fetch_token_holdings, RpcEndpointPool, TokenHolding};

/// Outcome of a liquidation run, one entry per token processed.
#[derive(Debug, Default)]
pub struct LiquidationReport {
    pub sold: Vec<String>,
    pub failed: Vec<String>,
}

/// Sells every non-zero token balance held by the configured wallet.
/// Best-effort: a failure on one token never stops the rest.
pub struct Liquidator {
    client: PumpPortalClient,
    endpoints: RpcEndpointPool,
    config: Arc<Config>,
}

impl Liquidator {
    pub fn new(config: Arc<Config>) -> Result<Self> {
        // Longer timeout than the trade loop; sells are not latency-critical
        let client = PumpPortalClient::with_timeout(
            &config.api_base_url,
            &config.pumpportal_api_key,
            Duration::from_secs(15),
        );
        let endpoints = RpcEndpointPool::new(config.rpc_endpoints.clone())?;
        Ok(Self {
            client,
            endpoints,
            config,
        })
    }

    /// Fetch the wallet's holdings once and sell each in full.
    pub async fn run(&mut self) -> Result<LiquidationReport> {
        info!("Checking tokens in wallet: {}", self.config.wallet_address);
        let holdings =
            fetch_token_holdings(self.endpoints.current(), &self.config.wallet_address).await?;

        if holdings.is_empty() {
            info!("No tokens found to sell");
            return Ok(LiquidationReport::default());
        }

        info!("Attempting to sell {} tokens", holdings.len());
        Ok(self.sell_holdings(&holdings).await)
    }

    /// Sell each holding independently, logging and recording every outcome.
    pub async fn sell_holdings(&mut self, holdings: &[TokenHolding]) -> LiquidationReport {
        let mut report = LiquidationReport::default();

        for (i, holding) in holdings.iter().enumerate() {
            info!("Selling {} of token {}", holding.amount_ui, holding.mint);
            if self.sell_token(&holding.mint).await {
                report.sold.push(holding.mint.clone());
            } else {
                error!("Failed to sell token {}", holding.mint);
                report.failed.push(holding.mint.clone());
            }

            // Space out sells to stay under the API rate limit
            if i + 1 < holdings.len() {
                tokio::time::sleep(self.config.liquidation_pause()).await;
            }
        }

        info!(
            "Finished selling: {} sold, {} failed",
            report.sold.len(),
            report.failed.len()
        );
        report
    }

    /// Sell the full balance of one token, rotating RPC endpoints on failure.
    pub async fn sell_token(&mut self, mint: &str) -> bool {
        let mint = mint.trim();
        let max_retries = self.config.liquidation_max_retries;
        let mut request = TradeRequest::sell(
            mint,
            &SellAmount::All,
            self.config.slippage_percent,
            self.config.liquidation_priority_fee_sol,
            self.endpoints.current(),
        );

        for attempt in 1..=max_retries {
            info!("Selling token {} - attempt {}/{}", mint, attempt, max_retries);

            match self.client.trade(&request).await {
                Ok(response) if response.is_confirmed() => {
                    info!("Successfully sold token {}", mint);
                    if let Some(signature) = response.tx_signature() {
                        info!("Transaction signature: {}", signature);
                    }
                    return true;
                }
                Ok(response) => {
                    let error_msg = response.error_message();
                    warn!("Sell unsuccessful: {}", error_msg);

                    let lowered = error_msg.to_lowercase();
                    if lowered.contains("rpc") || lowered.contains("timeout") {
                        request.rpc_endpoint = self.endpoints.rotate().to_string();
                    }
                }
                Err(e) => {
                    error!(
                        "Request error selling token {} (attempt {}): {:?}",
                        mint, attempt, e
                    );
                    request.rpc_endpoint = self.endpoints.rotate().to_string();
                }
            }

            if attempt < max_retries {
                tokio::time::sleep(self.config.liquidation_pause()).await;
            }
        }

        error!("Failed to sell token {} after {} attempts", mint, max_retries);
        false
    }
}
