//! API route definitions

mod accounts;
mod actions;
mod estimate;
mod health;
mod pools;

#[cfg(test)]
pub(crate) mod testing;

use axum::Router;
use noloss_core::{PoolSnapshot, PoolSummary};
use rust_decimal::Decimal;
use tracing::warn;

use crate::error::{ApiError, ApiResult};
use crate::AppState;

/// Create all API routes
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .merge(pools::routes())
        .merge(accounts::routes())
        .merge(estimate::routes())
        .merge(actions::routes())
        .merge(health::routes())
}

/// Request time in unix seconds, read once per request
pub(crate) fn unix_now() -> i64 {
    chrono::Utc::now().timestamp()
}

pub(crate) async fn fetch_pool(state: &AppState, pool_id: u64) -> ApiResult<PoolSnapshot> {
    state
        .reader
        .pool(pool_id)
        .await?
        .ok_or(ApiError::PoolNotFound(pool_id))
}

/// Live APY, or `None` so projections fall back to the configured rate
pub(crate) async fn current_apy(state: &AppState) -> Option<Decimal> {
    match state.reader.current_apy().await {
        Ok(apy) => apy,
        Err(e) => {
            warn!("Failed to fetch live APY, using fallback: {}", e);
            None
        }
    }
}

pub(crate) async fn summarize(
    state: &AppState,
    pool: &PoolSnapshot,
    apy: Option<Decimal>,
    now: i64,
) -> ApiResult<PoolSummary> {
    let metrics = state.reader.pool_metrics(pool.id).await?;
    Ok(PoolSummary::build(
        pool,
        metrics.as_ref(),
        apy,
        &state.projector,
        now,
    )?)
}
