use anyhow::{Context, Result};
use std::env;
use std::time::Duration;

use crate::api::pumpportal::DEFAULT_API_URL;
use crate::error::RazorError;

/// Mainnet RPC endpoints used as trade request parameters, rotated on failure.
pub const DEFAULT_RPC_ENDPOINTS: &[&str] = &[
    "https://api.mainnet-beta.solana.com",
    "https://solana-api.projectserum.com",
    "https://rpc.ankr.com/solana",
    "https://solana-mainnet.g.alchemy.com/v2/demo",
    "https://mainnet.solana.blockdaemon.tech",
    "https://solana-mainnet.rpc.extrnode.com",
    "https://mainnet.helius-rpc.com/?api-key=1d8740dc-e5f4-421c-b823-e1bad1889eff",
];

#[derive(Clone, Debug)]
pub struct Config {
    pub pumpportal_api_key: String,
    pub wallet_address: String,
    pub api_base_url: String,

    pub buy_amount_sol: f64,
    pub slippage_percent: u32,
    pub priority_fee_sol: f64,
    pub liquidation_priority_fee_sol: f64,

    pub session_duration_secs: u64,
    pub max_retries: u32,
    pub retry_delay_ms: u64,
    pub liquidation_max_retries: u32,
    pub liquidation_pause_ms: u64,

    pub rpc_endpoints: Vec<String>,
}

impl Config {
    pub fn load() -> Result<Self> {
        let rpc_endpoints = match env::var("SOLANA_RPC_ENDPOINTS") {
            Ok(raw) => parse_endpoints(&raw),
            Err(_) => DEFAULT_RPC_ENDPOINTS.iter().map(|s| s.to_string()).collect(),
        };
        if rpc_endpoints.is_empty() {
            return Err(
                RazorError::ConfigError("SOLANA_RPC_ENDPOINTS is set but empty".to_string()).into(),
            );
        }

        Ok(Self {
            pumpportal_api_key: env::var("PUMPPORTAL_API_KEY")
                .context("PUMPPORTAL_API_KEY not set in environment")?,
            wallet_address: env::var("WALLET_ADDRESS")
                .context("WALLET_ADDRESS not set in environment")?,
            api_base_url: env::var("PUMPPORTAL_API_URL")
                .unwrap_or_else(|_| DEFAULT_API_URL.to_string()),

            buy_amount_sol: env::var("BUY_AMOUNT_SOL")
                .unwrap_or_else(|_| "0.015".to_string())
                .parse()
                .unwrap_or(0.015),
            slippage_percent: env::var("SLIPPAGE_PERCENT")
                .unwrap_or_else(|_| "15".to_string())
                .parse()
                .context("Failed to parse SLIPPAGE_PERCENT")?,
            priority_fee_sol: env::var("PRIORITY_FEE_SOL")
                .unwrap_or_else(|_| "0.001".to_string())
                .parse()
                .unwrap_or(0.001),
            liquidation_priority_fee_sol: env::var("LIQUIDATION_PRIORITY_FEE_SOL")
                .unwrap_or_else(|_| "0.0005".to_string())
                .parse()
                .unwrap_or(0.0005),

            // 30 minutes unless overridden
            session_duration_secs: env::var("SESSION_DURATION_SECS")
                .unwrap_or_else(|_| "1800".to_string())
                .parse()
                .unwrap_or(1800),
            max_retries: env::var("MAX_RETRIES")
                .unwrap_or_else(|_| "3".to_string())
                .parse()
                .unwrap_or(3),
            retry_delay_ms: env::var("RETRY_DELAY_MS")
                .unwrap_or_else(|_| "100".to_string())
                .parse()
                .unwrap_or(100),
            liquidation_max_retries: env::var("LIQUIDATION_MAX_RETRIES")
                .unwrap_or_else(|_| "5".to_string())
                .parse()
                .unwrap_or(5),
            liquidation_pause_ms: env::var("LIQUIDATION_PAUSE_MS")
                .unwrap_or_else(|_| "2000".to_string())
                .parse()
                .unwrap_or(2000),

            rpc_endpoints,
        })
    }

    pub fn session_duration(&self) -> Duration {
        Duration::from_secs(self.session_duration_secs)
    }

    pub fn retry_delay(&self) -> Duration {
        Duration::from_millis(self.retry_delay_ms)
    }

    pub fn liquidation_pause(&self) -> Duration {
        Duration::from_millis(self.liquidation_pause_ms)
    }
}

fn parse_endpoints(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}
