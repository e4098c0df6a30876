pub mod pumpportal;

pub use pumpportal::{PumpPortalClient, SellAmount, TradeRequest, TradeResponse};
