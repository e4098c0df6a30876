use anyhow::{Context, Result};
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, warn};

use crate::error::RazorError;

pub const DEFAULT_API_URL: &str = "https://pumpportal.fun/api";

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Clone)]
pub struct PumpPortalClient {
    client: Client,
    base_url: String,
    api_key: String,
}

/// How much of a token to sell.
#[derive(Debug, Clone, PartialEq)]
pub enum SellAmount {
    /// Sell the full held balance.
    All,
    /// Sell an exact token amount, e.g. the amount received by the paired buy.
    Exact(f64),
}

impl SellAmount {
    fn to_api_string(&self) -> String {
        match self {
            SellAmount::All => "100%".to_string(),
            SellAmount::Exact(amount) => amount.to_string(),
        }
    }
}

/// One order as the PumpPortal trade endpoint expects it. All values travel
/// as strings on the wire.
#[derive(Debug, Clone, Serialize)]
pub struct TradeRequest {
    pub action: String,
    pub mint: String,
    pub amount: String,
    #[serde(rename = "denominatedInSol")]
    pub denominated_in_sol: String,
    pub slippage: String,
    #[serde(rename = "priorityFee")]
    pub priority_fee: String,
    #[serde(rename = "rpcEndpoint")]
    pub rpc_endpoint: String,
    #[serde(rename = "skipPreflight")]
    pub skip_preflight: String,
}

impl TradeRequest {
    /// A buy order spending `amount_sol` SOL.
    pub fn buy(
        mint: &str,
        amount_sol: f64,
        slippage_percent: u32,
        priority_fee_sol: f64,
        rpc_endpoint: &str,
    ) -> Self {
        Self {
            action: "buy".to_string(),
            mint: mint.trim().to_string(),
            amount: amount_sol.to_string(),
            denominated_in_sol: "true".to_string(),
            slippage: slippage_percent.to_string(),
            priority_fee: priority_fee_sol.to_string(),
            rpc_endpoint: rpc_endpoint.to_string(),
            skip_preflight: "true".to_string(),
        }
    }

    /// A sell order denominated in tokens.
    pub fn sell(
        mint: &str,
        amount: &SellAmount,
        slippage_percent: u32,
        priority_fee_sol: f64,
        rpc_endpoint: &str,
    ) -> Self {
        Self {
            action: "sell".to_string(),
            mint: mint.trim().to_string(),
            amount: amount.to_api_string(),
            denominated_in_sol: "false".to_string(),
            slippage: slippage_percent.to_string(),
            priority_fee: priority_fee_sol.to_string(),
            rpc_endpoint: rpc_endpoint.to_string(),
            skip_preflight: "true".to_string(),
        }
    }
}

/// Acknowledgment returned by the trade endpoint. The API answers in two
/// shapes: an explicit `success` flag, or a `signature` plus an `errors` list.
#[derive(Debug, Clone, Deserialize)]
pub struct TradeResponse {
    #[serde(default)]
    pub success: Option<bool>,
    #[serde(default)]
    pub signature: Option<String>,
    #[serde(default)]
    pub txid: Option<String>,
    #[serde(default)]
    pub errors: Option<Vec<String>>,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub amount_out: Option<f64>,
}

impl TradeResponse {
    /// A trade is confirmed when `success` is true, or when a signature is
    /// present with no accompanying errors.
    pub fn is_confirmed(&self) -> bool {
        self.success.unwrap_or(false)
            || (self.signature.is_some() && self.errors.as_deref().unwrap_or_default().is_empty())
    }

    pub fn tx_signature(&self) -> Option<&str> {
        self.txid.as_deref().or(self.signature.as_deref())
    }

    pub fn error_message(&self) -> String {
        if let Some(errors) = self.errors.as_deref() {
            if !errors.is_empty() {
                return errors.join(", ");
            }
        }
        self.error
            .clone()
            .unwrap_or_else(|| "Unknown error".to_string())
    }
}

impl PumpPortalClient {
    pub fn new(base_url: &str, api_key: &str) -> Self {
        Self::with_timeout(base_url, api_key, DEFAULT_TIMEOUT)
    }

    pub fn with_timeout(base_url: &str, api_key: &str, timeout: Duration) -> Self {
        Self {
            client: Client::builder()
                .timeout(timeout)
                .user_agent("razor-bot/0.1")
                .build()
                .expect("Failed to create HTTP client for PumpPortal"),
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
        }
    }

    /// Submit one order. Transport failures, non-2xx statuses and rate
    /// limiting are errors; an unconfirmed-but-parsed response is not, the
    /// caller inspects it via [`TradeResponse::is_confirmed`].
    pub async fn trade(&self, request: &TradeRequest) -> Result<TradeResponse> {
        let url = format!("{}/trade", self.base_url);
        debug!(
            "Sending {} order for {} via {}",
            request.action, request.mint, request.rpc_endpoint
        );

        let response = self
            .client
            .post(&url)
            .query(&[("api-key", self.api_key.as_str())])
            .json(request)
            .send()
            .await
            .context("Failed to send trade request to PumpPortal API")?;

        if response.status() == StatusCode::TOO_MANY_REQUESTS {
            warn!("Rate limit hit on PumpPortal API");
            return Err(RazorError::RateLimited.into());
        }

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(RazorError::ApiError(format!(
                "PumpPortal trade API failed with status {}: {}",
                status, error_text
            ))
            .into());
        }

        let trade_response: TradeResponse = response
            .json()
            .await
            .context("Failed to parse PumpPortal trade API response")?;
        Ok(trade_response)
    }
}
