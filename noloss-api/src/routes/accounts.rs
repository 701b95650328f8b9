//! Account dashboard: balance, positions and created pools

use axum::{
    extract::{Path, State},
    response::Json,
    routing::get,
    Router,
};
use futures::future::try_join_all;
use noloss_chain::fetch_all_pools;
use noloss_core::{
    classify, compute_user_payout, to_display, PoolStatus, PoolSummary, Side, UserPayout,
};
use serde::Serialize;
use tracing::debug;

use super::{current_apy, summarize, unix_now};
use crate::error::ApiResult;
use crate::AppState;

/// One of the account's bets
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PositionView {
    pub pool_id: u64,
    pub question: String,
    pub status: PoolStatus,
    pub side: Side,
    pub principal: String,
    pub claimed: bool,
    pub payout: Option<UserPayout>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountResponse {
    pub address: String,
    /// Staked token balance
    pub balance: String,
    pub positions: Vec<PositionView>,
    pub created_pools: Vec<PoolSummary>,
    /// Resolved positions not yet claimed
    pub claimable_count: usize,
}

async fn get_account(
    State(state): State<AppState>,
    Path(address): Path<String>,
) -> ApiResult<Json<AccountResponse>> {
    let now = unix_now();
    let config = state.projector.config();
    let decimals = config.token_decimals;

    let balance = state.reader.token_balance(&address).await?;
    let pools = fetch_all_pools(state.reader.as_ref()).await?;
    let apy = current_apy(&state).await;

    let bets = try_join_all(pools.iter().map(|pool| state.reader.user_bet(pool.id, &address))).await?;

    let mut positions = Vec::new();
    for (pool, bet) in pools.iter().zip(bets) {
        let Some(bet) = bet.filter(|b| b.has_bet()) else {
            continue;
        };

        let payout = if pool.resolved {
            let metrics = state.reader.pool_metrics(pool.id).await?;
            let projection = state
                .projector
                .project(Some(pool), metrics.as_ref(), apy, now)?;
            compute_user_payout(pool, Some(&bet), projection.prize_pool, decimals)?
        } else {
            None
        };

        positions.push(PositionView {
            pool_id: pool.id,
            question: pool.question.clone(),
            status: classify(pool, now, config.liveness_window_secs),
            side: bet.side,
            principal: to_display(bet.principal, decimals),
            claimed: bet.claimed,
            payout,
        });
    }

    let created = pools.iter().filter(|pool| pool.is_creator(&address));
    let created_pools = try_join_all(created.map(|pool| summarize(&state, pool, apy, now))).await?;

    let claimable_count = positions
        .iter()
        .filter(|p| p.status == PoolStatus::Resolved && !p.claimed)
        .count();

    debug!(
        "Account {}: {} positions, {} created pools",
        address,
        positions.len(),
        created_pools.len()
    );

    Ok(Json(AccountResponse {
        address,
        balance: to_display(balance, decimals),
        positions,
        created_pools,
        claimable_count,
    }))
}

/// Create account routes
pub fn routes() -> Router<AppState> {
    Router::new().route("/accounts/{address}", get(get_account))
}

#[cfg(test)]
mod tests {
    use super::super::testing::*;
    use axum::http::StatusCode;
    use noloss_core::Side;

    #[tokio::test]
    async fn test_account_dashboard() {
        let live_end = chrono::Utc::now().timestamp() + 3_600;
        let mut market = FakeMarket::with_pools(vec![
            pool(1, live_end),
            resolved(2, Side::Yes),
            resolved(3, Side::No),
        ])
        .with_metrics(2, 10 * TOKEN)
        .with_bet(1, BETTOR, bet(Side::Yes, 5, 5))
        .with_bet(2, BETTOR, bet(Side::Yes, 50, 100));
        market
            .balances
            .insert(BETTOR.to_lowercase(), 1_500_000_000_000_000_000);
        let (app, _) = test_app(market, false);

        let (status, body) = get(&app, &format!("/api/accounts/{}", BETTOR)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["balance"], "1.5");

        let positions = body["positions"].as_array().unwrap();
        assert_eq!(positions.len(), 2);
        // newest first
        assert_eq!(positions[0]["poolId"], 2);
        assert_eq!(positions[0]["status"], "resolved");
        assert_eq!(positions[0]["payout"]["winnings"], "3");
        assert_eq!(positions[1]["poolId"], 1);
        assert!(positions[1]["payout"].is_null());

        assert_eq!(body["claimableCount"], 1);
        assert_eq!(body["createdPools"].as_array().unwrap().len(), 0);
    }

    #[tokio::test]
    async fn test_creator_sees_created_pools() {
        let market = FakeMarket::with_pools(vec![pool(1, 0), resolved(2, Side::Yes)]);
        let (app, _) = test_app(market, false);

        let (_, body) = get(&app, &format!("/api/accounts/{}", CREATOR.to_lowercase())).await;
        assert_eq!(body["createdPools"].as_array().unwrap().len(), 2);
        assert_eq!(body["balance"], "0");
    }

    #[tokio::test]
    async fn test_invalid_address() {
        let (app, _) = test_app(FakeMarket::default(), false);
        let (status, body) = get(&app, "/api/accounts/not-an-address").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].as_str().unwrap().contains("not-an-address"));
    }
}
