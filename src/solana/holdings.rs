use anyhow::Result;
use serde_json::Value;
use solana_account_decoder::UiAccountData;
use solana_client::{rpc_client::RpcClient, rpc_request::TokenAccountsFilter};
use solana_sdk::{commitment_config::CommitmentConfig, pubkey::Pubkey};
use std::str::FromStr;
use tracing::{info, warn};

use crate::error::RazorError;

/// A non-zero SPL token balance held by the wallet.
#[derive(Debug, Clone, PartialEq)]
pub struct TokenHolding {
    pub mint: String,
    pub amount_ui: f64,
}

/// Fetch every non-zero SPL token balance of `wallet_address` with a single
/// getTokenAccountsByOwner call against `rpc_url`.
pub async fn fetch_token_holdings(
    rpc_url: &str,
    wallet_address: &str,
) -> Result<Vec<TokenHolding>> {
    let owner = Pubkey::from_str(wallet_address.trim()).map_err(|e| {
        RazorError::ConfigError(format!("Invalid wallet address {}: {}", wallet_address, e))
    })?;
    let url = rpc_url.to_string();

    // RpcClient is blocking; run the call on the blocking pool
    let accounts = tokio::task::spawn_blocking(move || {
        let client = RpcClient::new_with_commitment(url, CommitmentConfig::confirmed());
        client.get_token_accounts_by_owner(&owner, TokenAccountsFilter::ProgramId(spl_token::id()))
    })
    .await?
    .map_err(|e| RazorError::RpcError(format!("getTokenAccountsByOwner failed: {}", e)))?;

    let mut holdings = Vec::new();
    for keyed in accounts {
        let parsed = match keyed.account.data {
            UiAccountData::Json(account) => account.parsed,
            _ => {
                warn!("Token account {} returned unparsed data, skipping", keyed.pubkey);
                continue;
            }
        };
        if let Some(holding) = holding_from_parsed(&parsed) {
            holdings.push(holding);
        }
    }

    info!("Found {} tokens with non-zero balance", holdings.len());
    Ok(holdings)
}

/// Extract a holding from one jsonParsed token account. Zero balances and
/// malformed accounts yield `None`.
fn holding_from_parsed(parsed: &Value) -> Option<TokenHolding> {
    let info = &parsed["info"];
    let mint = info["mint"].as_str()?;
    let amount = info["tokenAmount"]["uiAmount"].as_f64().unwrap_or(0.0);
    if amount <= 0.0 {
        return None;
    }
    Some(TokenHolding {
        mint: mint.to_string(),
        amount_ui: amount,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parses_token_account_with_balance() {
        let parsed = json!({
            "type": "account",
            "info": {
                "mint": "MintAddr111",
                "owner": "WalletAddr111",
                "tokenAmount": {
                    "amount": "1500000",
                    "decimals": 6,
                    "uiAmount": 1.5,
                    "uiAmountString": "1.5"
                }
            }
        });

        let holding = holding_from_parsed(&parsed).unwrap();
        assert_eq!(holding.mint, "MintAddr111");
        assert!((holding.amount_ui - 1.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_skips_zero_balance() {
        let parsed = json!({
            "info": {
                "mint": "MintAddr111",
                "tokenAmount": { "amount": "0", "decimals": 6, "uiAmount": 0.0 }
            }
        });
        assert!(holding_from_parsed(&parsed).is_none());
    }

    #[test]
    fn test_skips_malformed_account() {
        let parsed = json!({ "info": { "tokenAmount": { "uiAmount": 3.0 } } });
        assert!(holding_from_parsed(&parsed).is_none());

        let parsed = json!({ "info": { "mint": "MintAddr111" } });
        assert!(holding_from_parsed(&parsed).is_none());
    }
}
