//! Pool listing, detail and payout preview endpoints

use axum::{
    extract::{Path, Query, State},
    response::Json,
    routing::get,
    Router,
};
use futures::future::try_join_all;
use noloss_chain::fetch_all_pools;
use noloss_core::{
    can_claim_creator_rewards, classify, compute_creator_payout, compute_user_payout, to_display,
    weight_share_percent, CreatorPayout, PoolStatus, PoolSummary, Side, UserPayout,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::{current_apy, fetch_pool, summarize, unix_now};
use crate::error::{ApiError, ApiResult};
use crate::AppState;

/// Query parameters for pool listing
#[derive(Debug, Deserialize)]
pub struct ListPoolsQuery {
    /// Only pools in this status (e.g. "live", "resolved")
    pub status: Option<String>,
    /// Case-insensitive substring match on the question
    pub q: Option<String>,
    pub limit: Option<usize>,
}

/// A bettor's position as shown next to a pool
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BetView {
    pub side: Side,
    pub principal: String,
    /// Raw time-weighted stake
    pub weight: String,
    /// Share of the side's total weight, in percent
    pub weight_share_percent: Option<f64>,
    pub claimed: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BetResponse {
    pub pool_id: u64,
    pub address: String,
    pub bet: Option<BetView>,
    pub payout: Option<UserPayout>,
    pub can_claim: bool,
}

#[derive(Debug, Deserialize)]
pub struct CreatorQuery {
    /// Connected address, used to report whether it may claim
    pub address: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatorResponse {
    pub pool_id: u64,
    pub creator: String,
    pub principal: String,
    pub payout: Option<CreatorPayout>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub can_claim: Option<bool>,
}

/// List pools, newest first
async fn list_pools(
    State(state): State<AppState>,
    Query(query): Query<ListPoolsQuery>,
) -> ApiResult<Json<Vec<PoolSummary>>> {
    let now = unix_now();
    let liveness = state.projector.config().liveness_window_secs;

    let status = query
        .status
        .as_deref()
        .map(str::parse::<PoolStatus>)
        .transpose()
        .map_err(ApiError::BadRequest)?;
    let search = query
        .q
        .as_deref()
        .map(str::trim)
        .filter(|q| !q.is_empty())
        .map(str::to_lowercase);

    let pools: Vec<_> = fetch_all_pools(state.reader.as_ref())
        .await?
        .into_iter()
        .filter(|pool| status.map_or(true, |s| classify(pool, now, liveness) == s))
        .filter(|pool| {
            search
                .as_ref()
                .map_or(true, |q| pool.question.to_lowercase().contains(q))
        })
        .take(query.limit.unwrap_or(usize::MAX))
        .collect();

    let apy = current_apy(&state).await;
    let summaries = try_join_all(pools.iter().map(|pool| summarize(&state, pool, apy, now))).await?;

    debug!("Listing {} pools", summaries.len());
    Ok(Json(summaries))
}

async fn get_pool(
    State(state): State<AppState>,
    Path(pool_id): Path<u64>,
) -> ApiResult<Json<PoolSummary>> {
    let now = unix_now();
    let pool = fetch_pool(&state, pool_id).await?;
    let apy = current_apy(&state).await;

    Ok(Json(summarize(&state, &pool, apy, now).await?))
}

/// A bettor's position and payout preview in one pool
async fn get_bet(
    State(state): State<AppState>,
    Path((pool_id, address)): Path<(u64, String)>,
) -> ApiResult<Json<BetResponse>> {
    let now = unix_now();
    let pool = fetch_pool(&state, pool_id).await?;
    let bet = state.reader.user_bet(pool_id, &address).await?;
    let decimals = state.projector.config().token_decimals;

    let payout = match &bet {
        Some(bet) if pool.resolved => {
            let metrics = state.reader.pool_metrics(pool_id).await?;
            let apy = current_apy(&state).await;
            let projection = state
                .projector
                .project(Some(&pool), metrics.as_ref(), apy, now)?;

            if bet.side == pool.outcome && pool.side_weight(pool.outcome) == 0 {
                warn!(
                    "Pool {} resolved {} with zero winning weight, winnings preview is zero",
                    pool_id, pool.outcome
                );
            }

            compute_user_payout(&pool, Some(bet), projection.prize_pool, decimals)?
        }
        _ => None,
    };

    let can_claim = pool.resolved && bet.as_ref().is_some_and(|b| b.has_bet() && !b.claimed);

    let bet = bet.filter(|b| b.has_bet()).map(|b| BetView {
        side: b.side,
        principal: to_display(b.principal, decimals),
        weight: b.weight.to_string(),
        weight_share_percent: weight_share_percent(b.weight, pool.side_weight(b.side)),
        claimed: b.claimed,
    });

    Ok(Json(BetResponse {
        pool_id,
        address,
        bet,
        payout,
        can_claim,
    }))
}

/// Creator refund and reward preview
async fn get_creator(
    State(state): State<AppState>,
    Path(pool_id): Path<u64>,
    Query(query): Query<CreatorQuery>,
) -> ApiResult<Json<CreatorResponse>> {
    let now = unix_now();
    let pool = fetch_pool(&state, pool_id).await?;
    let decimals = state.projector.config().token_decimals;

    let payout = if pool.resolved {
        let metrics = state.reader.pool_metrics(pool_id).await?;
        let apy = current_apy(&state).await;
        let projection = state
            .projector
            .project(Some(&pool), metrics.as_ref(), apy, now)?;
        compute_creator_payout(&pool, projection.creator_reward, decimals)?
    } else {
        None
    };

    let can_claim = query
        .address
        .as_deref()
        .map(|address| can_claim_creator_rewards(&pool, address));

    Ok(Json(CreatorResponse {
        pool_id,
        principal: to_display(pool.creator_principal, decimals),
        creator: pool.creator,
        payout,
        can_claim,
    }))
}

/// Create pool routes
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/pools", get(list_pools))
        .route("/pools/{id}", get(get_pool))
        .route("/pools/{id}/bets/{address}", get(get_bet))
        .route("/pools/{id}/creator", get(get_creator))
}
