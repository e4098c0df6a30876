use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::Result;
use tracing::{error, info, warn};

use crate::api::pumpportal::{PumpPortalClient, SellAmount, TradeRequest, TradeResponse};
use crate::config::Config;
use crate::error::RazorError;
use crate::solana::RpcEndpointPool;
use crate::trading::stats::SessionStats;

/// Deadline-bounded buy/sell cycle engine. One request is in flight at a
/// time; failures rotate the RPC endpoint and retry up to the configured
/// number of attempts, then the loop moves on to the next step.
pub struct TradeExecutor {
    client: PumpPortalClient,
    endpoints: RpcEndpointPool,
    config: Arc<Config>,
    stats: SessionStats,
}

impl TradeExecutor {
    pub fn new(config: Arc<Config>) -> Result<Self> {
        let client = PumpPortalClient::new(&config.api_base_url, &config.pumpportal_api_key);
        let endpoints = RpcEndpointPool::new(config.rpc_endpoints.clone())?;
        Ok(Self {
            client,
            endpoints,
            config,
            stats: SessionStats::new(),
        })
    }

    pub fn stats(&self) -> &SessionStats {
        &self.stats
    }

    /// Run buy/sell cycles for `mint` until `duration` elapses, then log the
    /// final summary. Never starts a new cycle past the deadline; a single
    /// in-flight call may overshoot it.
    pub async fn run(&mut self, mint: &str, duration: Duration) -> &SessionStats {
        let mint = mint.trim();
        info!(
            "Starting razor in high-TPM mode for {:.1} minutes",
            duration.as_secs_f64() / 60.0
        );
        info!("Target token: {}", mint);
        info!("Trade amount: {} SOL", self.config.buy_amount_sol);
        info!("Slippage: {}%", self.config.slippage_percent);
        info!("Priority fee: {} SOL", self.config.priority_fee_sol);
        info!("Using {} RPC endpoints", self.endpoints.len());

        self.stats = SessionStats::new();
        let deadline = Instant::now() + duration;
        let mut cycle_count: u64 = 0;

        // No pause between cycles
        while Instant::now() < deadline {
            let success = self.execute_cycle(mint).await;
            cycle_count += 1;

            let remaining = deadline.saturating_duration_since(Instant::now());
            info!("Cycle {} completed. Success: {}", cycle_count, success);
            info!(
                "Stats: {}/{} successful attempts ({:.1} TPM)",
                self.stats.successes(),
                self.stats.attempts(),
                self.stats.tpm()
            );
            info!("Time remaining: {:.1} minutes", remaining.as_secs_f64() / 60.0);
        }

        self.stats.log_summary();
        &self.stats
    }

    /// One complete buy-sell cycle. A failed buy skips the paired sell.
    async fn execute_cycle(&mut self, mint: &str) -> bool {
        let buy_result = match self.buy(mint).await {
            Some(response) => response,
            None => {
                error!("Buy operation failed, skipping sell");
                return false;
            }
        };

        // Sell what the buy produced when the API reports it, else everything
        let amount = match buy_result.amount_out {
            Some(tokens) => SellAmount::Exact(tokens),
            None => SellAmount::All,
        };
        self.sell(mint, &amount).await.is_some()
    }

    async fn buy(&mut self, mint: &str) -> Option<TradeResponse> {
        let request = TradeRequest::buy(
            mint,
            self.config.buy_amount_sol,
            self.config.slippage_percent,
            self.config.priority_fee_sol,
            self.endpoints.current(),
        );
        self.submit_with_retry(request).await
    }

    async fn sell(&mut self, mint: &str, amount: &SellAmount) -> Option<TradeResponse> {
        let request = TradeRequest::sell(
            mint,
            amount,
            self.config.slippage_percent,
            self.config.priority_fee_sol,
            self.endpoints.current(),
        );
        self.submit_with_retry(request).await
    }

    /// Submit one logical order, retrying up to `max_retries` attempts.
    /// Transport errors and rate limits always rotate the endpoint; an
    /// unconfirmed response rotates only when the API blames the relay.
    async fn submit_with_retry(&mut self, mut request: TradeRequest) -> Option<TradeResponse> {
        let max_retries = self.config.max_retries;
        for attempt in 1..=max_retries {
            info!(
                "{} {} - attempt {}/{}",
                request.action, request.mint, attempt, max_retries
            );

            match self.client.trade(&request).await {
                Ok(response) if response.is_confirmed() => {
                    self.stats.record_success();
                    info!("Successfully executed {} for {}", request.action, request.mint);
                    if let Some(signature) = response.tx_signature() {
                        info!("Transaction signature: {}", signature);
                    }
                    return Some(response);
                }
                Ok(response) => {
                    self.stats.record_failure();
                    let error_msg = response.error_message();
                    warn!("{} unsuccessful: {}", request.action, error_msg);

                    let lowered = error_msg.to_lowercase();
                    if lowered.contains("rpc") || lowered.contains("timeout") {
                        request.rpc_endpoint = self.endpoints.rotate().to_string();
                    }
                }
                Err(e) => {
                    self.stats.record_failure();
                    match e.downcast_ref::<RazorError>() {
                        Some(RazorError::RateLimited) => {
                            warn!("{} rate limited, rotating RPC endpoint", request.action)
                        }
                        _ => error!(
                            "Request error on {} attempt {}: {:?}",
                            request.action, attempt, e
                        ),
                    }
                    request.rpc_endpoint = self.endpoints.rotate().to_string();
                }
            }

            if attempt < max_retries {
                tokio::time::sleep(self.config.retry_delay()).await;
            }
        }

        error!(
            "Failed to {} token {} after {} attempts",
            request.action, request.mint, max_retries
        );
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;
    use serde_json::json;

    fn test_config(base_url: &str) -> Arc<Config> {
        Arc::new(Config {
            pumpportal_api_key: "test-key".to_string(),
            wallet_address: "WalletAddr111".to_string(),
            api_base_url: base_url.to_string(),
            buy_amount_sol: 0.015,
            slippage_percent: 15,
            priority_fee_sol: 0.001,
            liquidation_priority_fee_sol: 0.0005,
            session_duration_secs: 1800,
            max_retries: 3,
            retry_delay_ms: 0,
            liquidation_max_retries: 2,
            liquidation_pause_ms: 0,
            rpc_endpoints: vec![
                "https://rpc0.example".to_string(),
                "https://rpc1.example".to_string(),
            ],
        })
    }

    #[tokio::test]
    async fn test_run_with_succeeding_api_counts_only_successes() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/trade")
            .with_status(200)
            .with_body(r#"{"signature": "5abc", "errors": []}"#)
            .create_async()
            .await;

        let mut executor = TradeExecutor::new(test_config(&server.url())).unwrap();
        executor.run("Mint", Duration::from_millis(200)).await;

        assert!(executor.stats().successes() >= 2, "at least one full cycle");
        assert_eq!(executor.stats().failures(), 0);
        assert_eq!(
            executor.stats().attempts(),
            executor.stats().successes() + executor.stats().failures()
        );
    }

    #[tokio::test]
    async fn test_run_with_failing_api_terminates_at_deadline() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/trade")
            .with_status(500)
            .with_body("boom")
            .create_async()
            .await;

        let started = Instant::now();
        let mut executor = TradeExecutor::new(test_config(&server.url())).unwrap();
        executor.run("Mint", Duration::from_millis(300)).await;

        assert!(started.elapsed() < Duration::from_secs(10));
        assert_eq!(executor.stats().successes(), 0);
        assert!(executor.stats().failures() > 0);
        assert_eq!(executor.stats().attempts(), executor.stats().failures());
    }

    #[tokio::test]
    async fn test_failed_buy_skips_sell() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/trade")
            .match_body(Matcher::PartialJson(json!({"action": "buy"})))
            .with_status(500)
            .create_async()
            .await;
        let sell_mock = server
            .mock("POST", "/trade")
            .match_body(Matcher::PartialJson(json!({"action": "sell"})))
            .with_status(200)
            .with_body(r#"{"success": true}"#)
            .expect(0)
            .create_async()
            .await;

        let mut executor = TradeExecutor::new(test_config(&server.url())).unwrap();
        let success = executor.execute_cycle("Mint").await;

        assert!(!success);
        sell_mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_unconfirmed_rpc_error_rotates_endpoint() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/trade")
            .with_status(200)
            .with_body(r#"{"success": false, "error": "rpc node unreachable"}"#)
            .create_async()
            .await;

        let mut executor = TradeExecutor::new(test_config(&server.url())).unwrap();
        let before = executor.endpoints.current().to_string();
        let result = executor.buy("Mint").await;

        assert!(result.is_none());
        // 3 attempts against a 2-entry pool lands one past the start
        assert_ne!(executor.endpoints.current(), before);
        assert_eq!(executor.stats().failures(), 3);
    }
}
