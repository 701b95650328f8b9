//! Yield projection and prize pool / creator split
//!
//! While a pool is live, total yield is estimated as the yield already accrued
//! on-chain plus simple (non-compounding) interest on the principal over the
//! remaining time. Once betting has closed the realized on-chain figure is used
//! as-is. The result is a display estimate, never a settlement amount.

use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::amount::to_decimal;
use crate::config::ProtocolConfig;
use crate::error::{CoreError, CoreResult};
use crate::pool::{PoolMetrics, PoolSnapshot};
use crate::time::SECONDS_PER_DAY;

const DAYS_PER_YEAR: i64 = 365;

/// Seconds in a 365-day year, used to compound per-second lending rates
const SECONDS_PER_YEAR: f64 = 31_536_000.0;

/// Aave rates are scaled by 10^27
const RAY: f64 = 1e27;

/// Whether a projection is an estimate or the realized on-chain yield
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum YieldMode {
    Projected,
    Realized,
}

/// Total yield and how it splits between winners and the creator
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct YieldProjection {
    pub total_yield: Decimal,
    pub prize_pool: Decimal,
    pub creator_reward: Decimal,
    pub mode: YieldMode,
}

impl YieldProjection {
    pub fn zero() -> Self {
        Self {
            total_yield: Decimal::ZERO,
            prize_pool: Decimal::ZERO,
            creator_reward: Decimal::ZERO,
            mode: YieldMode::Projected,
        }
    }
}

/// Computes yield projections against an injected [`ProtocolConfig`]
#[derive(Debug, Clone, Default)]
pub struct YieldProjector {
    config: ProtocolConfig,
}

impl YieldProjector {
    pub fn new(config: ProtocolConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ProtocolConfig {
        &self.config
    }

    /// The live APY if there is one, else the configured fallback
    pub fn effective_apy(&self, apy: Option<Decimal>) -> Decimal {
        apy.unwrap_or(self.config.fallback_apy)
    }

    /// Project total yield for `pool` at instant `now`
    ///
    /// A missing pool projects to zero. A pool that has stopped accruing uses
    /// `metrics.current_total_yield` directly when metrics are available.
    pub fn project(
        &self,
        pool: Option<&PoolSnapshot>,
        metrics: Option<&PoolMetrics>,
        apy: Option<Decimal>,
        now: i64,
    ) -> CoreResult<YieldProjection> {
        let Some(pool) = pool else {
            return Ok(YieldProjection::zero());
        };
        let decimals = self.config.token_decimals;

        if !pool.is_live(now) {
            if let Some(metrics) = metrics {
                let realized = to_decimal(metrics.current_total_yield, decimals)?;
                return self.split(realized, YieldMode::Realized);
            }
        }

        let accrued = match metrics {
            Some(metrics) => to_decimal(metrics.current_total_yield, decimals)?,
            None => Decimal::ZERO,
        };
        let principal = to_decimal(pool.total_principal, decimals)?;
        let seconds_remaining = Decimal::from(pool.time_left_seconds(now));
        let seconds_per_year = Decimal::from(DAYS_PER_YEAR * SECONDS_PER_DAY);

        let future = self.simple_interest(principal, seconds_remaining, seconds_per_year, apy)?;
        let total = accrued
            .checked_add(future)
            .ok_or_else(|| CoreError::overflow("projected yield"))?;

        self.split(total, YieldMode::Projected)
    }

    /// Estimate for a pool that has not been created yet
    ///
    /// Returns zero unless both the seed and the duration are positive.
    pub fn estimate_new_pool(
        &self,
        seed: Decimal,
        duration_days: Decimal,
        apy: Option<Decimal>,
    ) -> CoreResult<YieldProjection> {
        if seed <= Decimal::ZERO || duration_days <= Decimal::ZERO {
            return Ok(YieldProjection::zero());
        }

        let total =
            self.simple_interest(seed, duration_days, Decimal::from(DAYS_PER_YEAR), apy)?;
        self.split(total, YieldMode::Projected)
    }

    /// `principal * apy% * period / period_per_year`, multiplied out before
    /// dividing so exact results stay exact
    fn simple_interest(
        &self,
        principal: Decimal,
        period: Decimal,
        period_per_year: Decimal,
        apy: Option<Decimal>,
    ) -> CoreResult<Decimal> {
        let apy = self.effective_apy(apy);

        principal
            .checked_mul(apy)
            .and_then(|p| p.checked_mul(period))
            .and_then(|p| p.checked_div(period_per_year * Decimal::ONE_HUNDRED))
            .ok_or_else(|| CoreError::overflow(format!("yield on principal {}", principal)))
    }

    /// Prize pool takes its share, the creator gets the remainder so the two
    /// always add up to `total`
    fn split(&self, total: Decimal, mode: YieldMode) -> CoreResult<YieldProjection> {
        let prize_pool = total
            .checked_mul(self.config.prize_pool_share)
            .map(|p| p / Decimal::ONE_HUNDRED)
            .ok_or_else(|| CoreError::overflow(format!("prize pool share of {}", total)))?;

        Ok(YieldProjection {
            total_yield: total.normalize(),
            prize_pool: prize_pool.normalize(),
            creator_reward: (total - prize_pool).normalize(),
            mode,
        })
    }
}

/// Convert an Aave `currentLiquidityRate` (per-second rate scaled by RAY) into
/// an APY percentage, compounding every second over a 365-day year
///
/// A zero rate yields `None` so callers fall back to the configured APY.
pub fn apy_from_liquidity_rate(liquidity_rate_ray: u128) -> Option<Decimal> {
    if liquidity_rate_ray == 0 {
        return None;
    }

    let rate = liquidity_rate_ray as f64 / RAY;
    let apy = (SECONDS_PER_YEAR * (rate / SECONDS_PER_YEAR).ln_1p()).exp_m1() * 100.0;

    if !apy.is_finite() {
        return None;
    }
    Decimal::from_f64(apy).map(|d| d.round_dp(6))
}
