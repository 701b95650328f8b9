//! Core types for the no-loss pool client
//!
//! This crate holds the pure side of the client: pool snapshots as read from
//! the `MarketController` contract, token amount formatting, countdowns,
//! yield projections, payout previews and pool status classification.
//! Nothing in here performs I/O or reads the clock; `now` is always passed in.

pub mod amount;
pub mod config;
pub mod error;
pub mod payout;
pub mod pool;
pub mod projection;
pub mod status;
pub mod summary;
pub mod time;

pub use amount::{to_decimal, to_display, to_raw};
pub use config::ProtocolConfig;
pub use error::{CoreError, CoreResult};
pub use payout::{
    can_claim_creator_rewards, compute_creator_payout, compute_user_payout, weight_share_percent,
    CreatorPayout, UserPayout,
};
pub use pool::{PoolMetrics, PoolSnapshot, Side, UserBet};
pub use projection::{apy_from_liquidity_rate, YieldMode, YieldProjection, YieldProjector};
pub use status::{classify, PoolAction, PoolStatus};
pub use summary::PoolSummary;
pub use time::{format_time_left, seconds_left};
