//! Settlement previews for bettors and creators
//!
//! Losers always get their principal back. Winners split the prize pool in
//! proportion to their time-weighted stake on the winning side.

use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::amount::to_decimal;
use crate::error::CoreResult;
use crate::pool::{PoolSnapshot, UserBet};

/// What a bettor receives when claiming
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserPayout {
    pub is_winner: bool,
    pub principal: Decimal,
    pub winnings: Decimal,
    pub total: Decimal,
    /// Already withdrawn on-chain
    pub claimed: bool,
}

/// What the creator receives when claiming creator rewards
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatorPayout {
    pub principal: Decimal,
    pub reward: Decimal,
    pub total: Decimal,
}

/// Preview a bettor's payout
///
/// Returns `Ok(None)` until the pool is resolved, and when there is no bet.
pub fn compute_user_payout(
    pool: &PoolSnapshot,
    bet: Option<&UserBet>,
    prize_pool: Decimal,
    decimals: u32,
) -> CoreResult<Option<UserPayout>> {
    let Some(bet) = bet.filter(|b| b.has_bet()) else {
        return Ok(None);
    };
    if !pool.resolved {
        return Ok(None);
    }

    let principal = to_decimal(bet.principal, decimals)?;
    let is_winner = bet.side == pool.outcome;

    let winnings = if is_winner {
        weighted_share(bet.weight, pool.side_weight(bet.side), prize_pool)
    } else {
        Decimal::ZERO
    };

    Ok(Some(UserPayout {
        is_winner,
        principal,
        winnings,
        total: principal + winnings,
        claimed: bet.claimed,
    }))
}

/// Preview the creator's refund plus reward; `Ok(None)` until resolved
pub fn compute_creator_payout(
    pool: &PoolSnapshot,
    creator_reward: Decimal,
    decimals: u32,
) -> CoreResult<Option<CreatorPayout>> {
    if !pool.resolved {
        return Ok(None);
    }

    let principal = to_decimal(pool.creator_principal, decimals)?;

    Ok(Some(CreatorPayout {
        principal,
        reward: creator_reward,
        total: principal + creator_reward,
    }))
}

/// `address` created this resolved pool and still has a seed to reclaim
pub fn can_claim_creator_rewards(pool: &PoolSnapshot, address: &str) -> bool {
    pool.is_creator(address) && pool.resolved && pool.creator_principal > 0
}

/// `prize * weight / winning_weight`, zero when the winning side has no weight
fn weighted_share(weight: u128, winning_weight: u128, prize: Decimal) -> Decimal {
    if winning_weight == 0 {
        return Decimal::ZERO;
    }

    let share = match (Decimal::from_u128(weight), Decimal::from_u128(winning_weight)) {
        (Some(weight), Some(winning_weight)) => prize
            .checked_mul(weight)
            .and_then(|p| p.checked_div(winning_weight))
            .or_else(|| {
                weight
                    .checked_div(winning_weight)
                    .and_then(|ratio| ratio.checked_mul(prize))
            })
            .unwrap_or(Decimal::ZERO),
        // Weights beyond the Decimal range only need the ratio
        _ => {
            let ratio = weight as f64 / winning_weight as f64;
            Decimal::from_f64(ratio)
                .and_then(|ratio| ratio.checked_mul(prize))
                .unwrap_or(Decimal::ZERO)
        }
    };
    share.normalize()
}

/// Share of the winning side's weight held by one bettor, as a percentage
pub fn weight_share_percent(weight: u128, winning_weight: u128) -> Option<f64> {
    if winning_weight == 0 {
        return None;
    }
    let share = Decimal::from_u128(weight)
        .zip(Decimal::from_u128(winning_weight))
        .and_then(|(w, t)| w.checked_div(t))
        .and_then(|ratio| ratio.to_f64())
        .unwrap_or(weight as f64 / winning_weight as f64);
    Some(share * 100.0)
}
