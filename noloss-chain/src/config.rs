//! Chain connection configuration

use alloy::primitives::Address;
use std::env;
use std::str::FromStr;

use crate::error::{ChainError, ChainResult};

/// Where the contracts live and how to reach them
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChainConfig {
    /// JSON-RPC endpoint (http(s) or ws(s))
    pub rpc_url: String,
    /// Deployed MarketController
    pub market_controller: Address,
    /// Yield-bearing token staked in pools
    pub token: Address,
    /// Aave v3 pool used for the live APY, if any
    pub aave_pool: Option<Address>,
    /// Confirmations awaited for each write
    pub confirmations: u64,
}

impl ChainConfig {
    /// Load configuration from environment variables
    ///
    /// Expects:
    /// - RPC_URL: JSON-RPC endpoint
    /// - MARKET_CONTROLLER_ADDRESS: pool controller contract
    /// - TOKEN_ADDRESS: staked ERC20 token
    ///
    /// Optional:
    /// - AAVE_POOL_ADDRESS: enables the live APY feed
    /// - TX_CONFIRMATIONS: confirmations per write (default 1)
    pub fn from_env() -> ChainResult<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> ChainResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &str| {
            lookup(key)
                .filter(|v| !v.trim().is_empty())
                .ok_or_else(|| ChainError::Config(format!("{} environment variable not set", key)))
        };

        let rpc_url = required("RPC_URL")?;
        let market_controller = parse_address(
            "MARKET_CONTROLLER_ADDRESS",
            &required("MARKET_CONTROLLER_ADDRESS")?,
        )?;
        let token = parse_address("TOKEN_ADDRESS", &required("TOKEN_ADDRESS")?)?;

        let aave_pool = match lookup("AAVE_POOL_ADDRESS").filter(|v| !v.trim().is_empty()) {
            Some(raw) => Some(parse_address("AAVE_POOL_ADDRESS", &raw)?),
            None => None,
        };

        let confirmations = match lookup("TX_CONFIRMATIONS") {
            Some(raw) => raw.trim().parse().map_err(|e| {
                ChainError::Config(format!("TX_CONFIRMATIONS={:?}: {}", raw, e))
            })?,
            None => default_confirmations(),
        };

        Ok(Self {
            rpc_url: rpc_url.trim().to_string(),
            market_controller,
            token,
            aave_pool,
            confirmations,
        })
    }
}

fn default_confirmations() -> u64 {
    1
}

fn parse_address(key: &str, raw: &str) -> ChainResult<Address> {
    Address::from_str(raw.trim())
        .map_err(|e| ChainError::Config(format!("{}={:?} is not an address: {}", key, raw, e)))
}
