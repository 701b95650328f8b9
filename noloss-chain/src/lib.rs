//! Chain access for the no-loss pool client
//!
//! This crate provides:
//! - `MarketReader` / `MarketWriter` traits describing the contract surface
//! - An alloy-backed `RpcMarketClient` implementing both
//! - Adapters from raw ABI return tuples to the core snapshot types
//! - Server wallet loading for backend-signed writes
//! - The Aave reserve APY feed

pub mod adapter;
pub mod client;
pub mod config;
pub mod contracts;
pub mod error;
pub mod market;
pub mod wallet;

pub use client::RpcMarketClient;
pub use config::ChainConfig;
pub use error::{ChainError, ChainResult};
pub use market::{fetch_all_pools, MarketReader, MarketWriter, TxHash};
pub use wallet::ServerWallet;
