//! Protocol constants shared by the projector, payout calculator and classifier

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::env;
use std::str::FromStr;

use crate::error::{CoreError, CoreResult};

/// Largest decimal count a [`Decimal`] can represent.
const MAX_TOKEN_DECIMALS: u32 = 28;

/// Immutable protocol configuration for a session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProtocolConfig {
    /// Percentage of total yield paid to winning bettors
    pub prize_pool_share: Decimal,
    /// Percentage of total yield paid to the pool creator
    pub creator_share: Decimal,
    /// APY (percent) used when no live rate is available
    pub fallback_apy: Decimal,
    /// Oracle dispute window after a resolution request, in seconds
    pub liveness_window_secs: i64,
    /// Decimals of the staked token
    pub token_decimals: u32,
}

impl Default for ProtocolConfig {
    fn default() -> Self {
        Self {
            prize_pool_share: Decimal::from(60),
            creator_share: Decimal::from(40),
            fallback_apy: Decimal::new(35, 1),
            liveness_window_secs: 30,
            token_decimals: 18,
        }
    }
}

impl ProtocolConfig {
    /// Load overrides from environment variables, falling back to defaults
    ///
    /// Reads:
    /// - PRIZE_POOL_SHARE / CREATOR_SHARE: yield split in percent
    /// - FALLBACK_APY: APY percent used without a live feed
    /// - LIVENESS_WINDOW_SECS: oracle liveness window
    /// - TOKEN_DECIMALS: staked token decimals
    pub fn from_env() -> CoreResult<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build a config from an arbitrary key lookup, then validate it
    pub fn from_lookup<F>(lookup: F) -> CoreResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let config = Self {
            prize_pool_share: parse_or("PRIZE_POOL_SHARE", &lookup, defaults.prize_pool_share)?,
            creator_share: parse_or("CREATOR_SHARE", &lookup, defaults.creator_share)?,
            fallback_apy: parse_or("FALLBACK_APY", &lookup, defaults.fallback_apy)?,
            liveness_window_secs: parse_or(
                "LIVENESS_WINDOW_SECS",
                &lookup,
                defaults.liveness_window_secs,
            )?,
            token_decimals: parse_or("TOKEN_DECIMALS", &lookup, defaults.token_decimals)?,
        };

        config.validate()?;
        Ok(config)
    }

    /// Check that the split covers exactly 100% and the rest is in range
    pub fn validate(&self) -> CoreResult<()> {
        if self.prize_pool_share.is_sign_negative() || self.creator_share.is_sign_negative() {
            return Err(CoreError::config("yield shares cannot be negative"));
        }
        if self.prize_pool_share + self.creator_share != Decimal::ONE_HUNDRED {
            return Err(CoreError::config(format!(
                "prize pool share ({}) and creator share ({}) must sum to 100",
                self.prize_pool_share, self.creator_share
            )));
        }
        if self.fallback_apy.is_sign_negative() {
            return Err(CoreError::config("fallback APY cannot be negative"));
        }
        if self.liveness_window_secs < 0 {
            return Err(CoreError::config("liveness window cannot be negative"));
        }
        if self.token_decimals > MAX_TOKEN_DECIMALS {
            return Err(CoreError::config(format!(
                "token decimals must be at most {}",
                MAX_TOKEN_DECIMALS
            )));
        }
        Ok(())
    }
}

fn parse_or<T, F>(key: &str, lookup: &F, default: T) -> CoreResult<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|e| CoreError::config(format!("{}={:?}: {}", key, raw, e))),
        None => Ok(default),
    }
}
