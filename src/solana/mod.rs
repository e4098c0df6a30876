pub mod endpoints;
pub mod holdings;

pub use endpoints::RpcEndpointPool;
pub use holdings::{fetch_token_holdings, TokenHolding};
