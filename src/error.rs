use thiserror::Error;

#[derive(Debug, Error)]
pub enum RazorError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("API error: {0}")]
    ApiError(String),

    #[error("Rate limit hit on PumpPortal API")]
    RateLimited,

    #[error("RPC error: {0}")]
    RpcError(String),
}
