//! Razor - high-transaction-rate pump executor for PumpPortal, plus a
//! wallet liquidation utility. Two binaries (`razor`, `liquidate`) share
//! this library crate.

pub mod api;
pub mod config;
pub mod error;
pub mod logging;
pub mod solana;
pub mod trading;
