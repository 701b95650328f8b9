//! The contract surface the rest of the client depends on
//!
//! Reads and writes are split so read-only deployments never need a key.

use async_trait::async_trait;
use futures::future::try_join_all;
use noloss_core::{PoolMetrics, PoolSnapshot, Side, UserBet};
use rust_decimal::Decimal;
use tracing::debug;

use crate::error::ChainResult;

/// Hex-encoded transaction hash
pub type TxHash = String;

/// Read access to pool state
#[async_trait]
pub trait MarketReader: Send + Sync {
    /// Number of pools created so far; ids run from 1 to this value
    async fn pool_count(&self) -> ChainResult<u64>;

    async fn pool(&self, pool_id: u64) -> ChainResult<Option<PoolSnapshot>>;

    async fn user_bet(&self, pool_id: u64, user: &str) -> ChainResult<Option<UserBet>>;

    async fn pool_metrics(&self, pool_id: u64) -> ChainResult<Option<PoolMetrics>>;

    /// Live supply APY in percent, `None` when no feed is available
    async fn current_apy(&self) -> ChainResult<Option<Decimal>>;

    /// Raw token balance of `owner`
    async fn token_balance(&self, owner: &str) -> ChainResult<u128>;
}

/// State-changing pool calls, each awaited to confirmation
///
/// Calls that move stake (`create_pool`, `place_bet`) first make sure the
/// controller has enough token allowance.
#[async_trait]
pub trait MarketWriter: Send + Sync {
    async fn create_pool(
        &self,
        question: &str,
        duration_secs: u64,
        seed_amount: u128,
    ) -> ChainResult<TxHash>;

    async fn place_bet(&self, pool_id: u64, side: Side, amount: u128) -> ChainResult<TxHash>;

    async fn claim(&self, pool_id: u64) -> ChainResult<TxHash>;

    async fn claim_creator_rewards(&self, pool_id: u64) -> ChainResult<TxHash>;

    async fn request_resolution(&self, pool_id: u64) -> ChainResult<TxHash>;

    async fn settle_resolution(&self, pool_id: u64) -> ChainResult<TxHash>;
}

/// Fetch every existing pool concurrently, newest first
pub async fn fetch_all_pools(reader: &dyn MarketReader) -> ChainResult<Vec<PoolSnapshot>> {
    let count = reader.pool_count().await?;
    debug!("Fetching {} pools", count);

    let pools = try_join_all((1..=count).rev().map(|id| reader.pool(id))).await?;

    Ok(pools.into_iter().flatten().collect())
}
