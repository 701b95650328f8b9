//! Display-ready view of a pool at one instant

use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::amount::to_display;
use crate::error::CoreResult;
use crate::pool::{PoolMetrics, PoolSnapshot, Side};
use crate::projection::{YieldProjection, YieldProjector};
use crate::status::{classify, PoolAction, PoolStatus};
use crate::time::format_time_left;

/// Everything a pool card or detail page shows, computed for one `now`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PoolSummary {
    pub id: u64,
    pub question: String,
    pub creator: String,
    pub end_time: i64,
    pub status: PoolStatus,
    pub status_label: String,
    pub next_action: Option<PoolAction>,
    pub time_left_seconds: i64,
    /// Countdown while live, status label otherwise
    pub time_left_label: String,
    pub total_principal: String,
    pub yes_principal: String,
    pub no_principal: String,
    pub creator_principal: String,
    /// YES principal as a percentage of all bettor principal
    pub yes_percent: Option<Decimal>,
    /// YES weight as a percentage of all weight, for the bet distribution bar
    pub yes_weight_percent: Option<Decimal>,
    pub outcome: Option<Side>,
    pub apy: Decimal,
    pub projection: YieldProjection,
}

impl PoolSummary {
    pub fn build(
        pool: &PoolSnapshot,
        metrics: Option<&PoolMetrics>,
        apy: Option<Decimal>,
        projector: &YieldProjector,
        now: i64,
    ) -> CoreResult<Self> {
        let config = projector.config();
        let decimals = config.token_decimals;
        let status = classify(pool, now, config.liveness_window_secs);
        let time_left_seconds = pool.time_left_seconds(now);
        let projection = projector.project(Some(pool), metrics, apy, now)?;

        let time_left_label = if status == PoolStatus::Live {
            format_time_left(time_left_seconds)
        } else {
            status.label().to_string()
        };

        Ok(Self {
            id: pool.id,
            question: pool.question.clone(),
            creator: pool.creator.clone(),
            end_time: pool.end_time,
            status,
            status_label: status.label().to_string(),
            next_action: status.next_action(),
            time_left_seconds,
            time_left_label,
            total_principal: to_display(pool.total_principal, decimals),
            yes_principal: to_display(pool.yes_principal, decimals),
            no_principal: to_display(pool.no_principal, decimals),
            creator_principal: to_display(pool.creator_principal, decimals),
            yes_percent: percent_of(pool.yes_principal, pool.no_principal),
            yes_weight_percent: percent_of(pool.total_yes_weight, pool.total_no_weight),
            outcome: pool.resolved.then_some(pool.outcome),
            apy: projector.effective_apy(apy),
            projection,
        })
    }
}

/// `yes / (yes + no)` in percent, rounded to 2 dp; `None` when both are zero
fn percent_of(yes: u128, no: u128) -> Option<Decimal> {
    let total = yes.checked_add(no)?;
    if total == 0 {
        return None;
    }
    let yes = Decimal::from_u128(yes)?;
    let total = Decimal::from_u128(total)?;
    yes.checked_mul(Decimal::ONE_HUNDRED)?
        .checked_div(total)
        .map(|p| p.round_dp(2))
}
