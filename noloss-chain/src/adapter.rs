//! Mapping from raw contract return tuples to the canonical core snapshots
//!
//! ABI layout changes are absorbed here; the core never sees `U256`.

use alloy::primitives::{Address, U256};
use noloss_core::{PoolMetrics, PoolSnapshot, Side, UserBet};

use crate::contracts::IMarketController::{betsReturn, getPoolMetricsReturn, poolsReturn};
use crate::error::{ChainError, ChainResult};

/// Build a pool snapshot; a zero creator means the id was never created
pub fn pool_from_raw(id: u64, raw: poolsReturn) -> ChainResult<Option<PoolSnapshot>> {
    if raw.creator == Address::ZERO {
        return Ok(None);
    }

    Ok(Some(PoolSnapshot {
        id,
        creator: raw.creator.to_checksum(None),
        question: raw.question,
        end_time: u256_to_timestamp("endTime", raw.endTime)?,
        total_shares: u256_to_u128("totalShares", raw.totalShares)?,
        total_principal: u256_to_u128("totalPrincipal", raw.totalPrincipal)?,
        creator_principal: u256_to_u128("creatorPrincipal", raw.creatorPrincipal)?,
        yes_principal: u256_to_u128("yesPrincipal", raw.yesPrincipal)?,
        no_principal: u256_to_u128("noPrincipal", raw.noPrincipal)?,
        total_yes_weight: u256_to_u128("totalYesWeight", raw.totalYesWeight)?,
        total_no_weight: u256_to_u128("totalNoWeight", raw.totalNoWeight)?,
        resolved: raw.resolved,
        outcome: Side::from(raw.outcome),
        final_total_yield: u256_to_u128("finalTotalYield", raw.finalTotalYield)?,
        request_submitted: raw.requestSubmitted,
        request_time: u256_to_timestamp("requestTime", raw.requestTime)?,
    }))
}

/// Build a user bet; an all-zero record means the user never bet
pub fn bet_from_raw(raw: betsReturn) -> ChainResult<Option<UserBet>> {
    if raw.principal.is_zero() && raw.weight.is_zero() && !raw.claimed {
        return Ok(None);
    }

    Ok(Some(UserBet {
        principal: u256_to_u128("principal", raw.principal)?,
        weight: u256_to_u128("weight", raw.weight)?,
        side: Side::from(raw.side),
        claimed: raw.claimed,
    }))
}

pub fn metrics_from_raw(raw: getPoolMetricsReturn) -> ChainResult<PoolMetrics> {
    Ok(PoolMetrics {
        current_total_yield: u256_to_u128("currentTotalYield", raw.currentTotalYield)?,
        estimated_winner_prize: u256_to_u128("estimatedWinnerPrize", raw.estimatedWinnerPrize)?,
        estimated_creator_fee: u256_to_u128("estimatedCreatorFee", raw.estimatedCreatorFee)?,
    })
}

pub(crate) fn u256_to_u128(field: &str, value: U256) -> ChainResult<u128> {
    value
        .try_into()
        .map_err(|_| ChainError::decode(format!("{} does not fit in u128: {}", field, value)))
}

pub(crate) fn u256_to_timestamp(field: &str, value: U256) -> ChainResult<i64> {
    let seconds: u64 = value
        .try_into()
        .map_err(|_| ChainError::decode(format!("{} is not a timestamp: {}", field, value)))?;
    i64::try_from(seconds)
        .map_err(|_| ChainError::decode(format!("{} is not a timestamp: {}", field, value)))
}
