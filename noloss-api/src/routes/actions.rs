//! Write endpoints, signed by the server wallet
//!
//! Every action checks the pool's current status before sending.

use axum::{
    extract::{Path, State},
    response::Json,
    routing::post,
    Router,
};
use noloss_chain::{ChainError, MarketWriter};
use noloss_core::{classify, to_raw, PoolSnapshot, PoolStatus, Side};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::info;

use super::{fetch_pool, unix_now};
use crate::error::{ApiError, ApiResult};
use crate::AppState;

/// Request to create a new pool
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePoolRequest {
    pub question: String,
    /// Duration in days; `durationSecs` takes precedence when both are set
    pub duration_days: Option<u64>,
    pub duration_secs: Option<u64>,
    /// Seed stake in whole tokens, e.g. "10.5"
    pub seed_amount: String,
}

/// Request to place a bet
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaceBetRequest {
    /// "yes" or "no"
    pub side: String,
    /// Stake in whole tokens
    pub amount: String,
}

/// Response for any submitted transaction
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TxResponse {
    pub success: bool,
    pub transaction_hash: String,
}

impl TxResponse {
    fn confirmed(transaction_hash: String) -> Json<Self> {
        Json(Self {
            success: true,
            transaction_hash,
        })
    }
}

fn writer(state: &AppState) -> ApiResult<Arc<dyn MarketWriter>> {
    state
        .writer
        .clone()
        .ok_or(ApiError::Chain(ChainError::WritesDisabled))
}

/// Load the pool and reject the action unless it is in `expected` status
async fn pool_in_status(
    state: &AppState,
    pool_id: u64,
    expected: PoolStatus,
) -> ApiResult<PoolSnapshot> {
    let pool = fetch_pool(state, pool_id).await?;
    let status = classify(
        &pool,
        unix_now(),
        state.projector.config().liveness_window_secs,
    );

    if status != expected {
        return Err(ApiError::Conflict(format!(
            "Pool {} is {} (expected {})",
            pool_id,
            status.label(),
            expected.label()
        )));
    }
    Ok(pool)
}

fn positive_amount(field: &str, raw: &str, decimals: u32) -> ApiResult<u128> {
    let amount = to_raw(raw, decimals).map_err(|e| ApiError::bad_request(e.to_string()))?;
    if amount == 0 {
        return Err(ApiError::bad_request(format!("{} must be positive", field)));
    }
    Ok(amount)
}

async fn create_pool(
    State(state): State<AppState>,
    Json(request): Json<CreatePoolRequest>,
) -> ApiResult<Json<TxResponse>> {
    let writer = writer(&state)?;

    let question = request.question.trim();
    if question.is_empty() {
        return Err(ApiError::bad_request("Question cannot be empty"));
    }

    let duration_secs = request
        .duration_secs
        .or_else(|| request.duration_days.and_then(|d| d.checked_mul(86_400)))
        .filter(|d| *d > 0)
        .ok_or_else(|| ApiError::bad_request("Duration must be positive"))?;

    let decimals = state.projector.config().token_decimals;
    let seed = positive_amount("Seed amount", &request.seed_amount, decimals)?;

    info!("Creating pool {:?} for {}s", question, duration_secs);
    let tx_hash = writer.create_pool(question, duration_secs, seed).await?;

    Ok(TxResponse::confirmed(tx_hash))
}

async fn place_bet(
    State(state): State<AppState>,
    Path(pool_id): Path<u64>,
    Json(request): Json<PlaceBetRequest>,
) -> ApiResult<Json<TxResponse>> {
    let writer = writer(&state)?;

    let side: Side = request.side.trim().parse().map_err(ApiError::BadRequest)?;
    let decimals = state.projector.config().token_decimals;
    let amount = positive_amount("Amount", &request.amount, decimals)?;

    pool_in_status(&state, pool_id, PoolStatus::Live).await?;

    info!("Placing {} bet of {} on pool {}", side, request.amount, pool_id);
    let tx_hash = writer.place_bet(pool_id, side, amount).await?;

    Ok(TxResponse::confirmed(tx_hash))
}

async fn claim(
    State(state): State<AppState>,
    Path(pool_id): Path<u64>,
) -> ApiResult<Json<TxResponse>> {
    let writer = writer(&state)?;
    pool_in_status(&state, pool_id, PoolStatus::Resolved).await?;

    let tx_hash = writer.claim(pool_id).await?;
    Ok(TxResponse::confirmed(tx_hash))
}

async fn claim_creator(
    State(state): State<AppState>,
    Path(pool_id): Path<u64>,
) -> ApiResult<Json<TxResponse>> {
    let writer = writer(&state)?;
    let pool = pool_in_status(&state, pool_id, PoolStatus::Resolved).await?;

    if pool.creator_principal == 0 {
        return Err(ApiError::Conflict(format!(
            "Pool {} has no creator rewards left to claim",
            pool_id
        )));
    }

    let tx_hash = writer.claim_creator_rewards(pool_id).await?;
    Ok(TxResponse::confirmed(tx_hash))
}

async fn request_resolution(
    State(state): State<AppState>,
    Path(pool_id): Path<u64>,
) -> ApiResult<Json<TxResponse>> {
    let writer = writer(&state)?;
    pool_in_status(&state, pool_id, PoolStatus::AwaitingResolution).await?;

    let tx_hash = writer.request_resolution(pool_id).await?;
    Ok(TxResponse::confirmed(tx_hash))
}

async fn settle_resolution(
    State(state): State<AppState>,
    Path(pool_id): Path<u64>,
) -> ApiResult<Json<TxResponse>> {
    let writer = writer(&state)?;
    pool_in_status(&state, pool_id, PoolStatus::Settleable).await?;

    let tx_hash = writer.settle_resolution(pool_id).await?;
    Ok(TxResponse::confirmed(tx_hash))
}

/// Create write action routes
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/pools", post(create_pool))
        .route("/pools/{id}/bets", post(place_bet))
        .route("/pools/{id}/claim", post(claim))
        .route("/pools/{id}/claim-creator", post(claim_creator))
        .route("/pools/{id}/request-resolution", post(request_resolution))
        .route("/pools/{id}/settle", post(settle_resolution))
}

#[cfg(test)]
mod tests {
    use super::super::testing::*;
    use axum::http::StatusCode;
    use noloss_core::{PoolSnapshot, Side};
    use serde_json::json;

    fn now() -> i64 {
        chrono::Utc::now().timestamp()
    }

    #[tokio::test]
    async fn test_writes_disabled_without_wallet() {
        let (app, _) = test_app(FakeMarket::with_pools(vec![pool(1, now() + 60)]), false);

        let (status, body) = post(
            &app,
            "/api/pools/1/bets",
            json!({ "side": "yes", "amount": "1" }),
        )
        .await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert!(body["error"].as_str().unwrap().contains("Writes are disabled"));
    }

    #[tokio::test]
    async fn test_create_pool() {
        let (app, market) = test_app(FakeMarket::default(), true);

        let (status, body) = post(
            &app,
            "/api/pools",
            json!({ "question": "  Will it snow?  ", "durationDays": 7, "seedAmount": "10.5" }),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], true);
        assert_eq!(body["transactionHash"], TX_HASH);
        assert_eq!(
            market.recorded_writes(),
            vec!["createPool:Will it snow?:604800:10500000000000000000".to_string()]
        );
    }

    #[tokio::test]
    async fn test_create_pool_validation() {
        let (app, market) = test_app(FakeMarket::default(), true);

        let (status, _) = post(
            &app,
            "/api/pools",
            json!({ "question": " ", "durationDays": 7, "seedAmount": "1" }),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, _) = post(
            &app,
            "/api/pools",
            json!({ "question": "Q?", "seedAmount": "1" }),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, _) = post(
            &app,
            "/api/pools",
            json!({ "question": "Q?", "durationSecs": 60, "seedAmount": "0" }),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, _) = post(
            &app,
            "/api/pools",
            json!({ "question": "Q?", "durationSecs": 60, "seedAmount": "-1" }),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, _) = post(
            &app,
            "/api/pools",
            json!({ "question": "Q?", "durationSecs": 60, "seedAmount": "1".repeat(40) }),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        assert!(market.recorded_writes().is_empty());
    }

    #[tokio::test]
    async fn test_place_bet_on_live_pool() {
        let (app, market) = test_app(FakeMarket::with_pools(vec![pool(1, now() + 600)]), true);

        let (status, _) = post(
            &app,
            "/api/pools/1/bets",
            json!({ "side": "NO", "amount": "2" }),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            market.recorded_writes(),
            vec!["placeBet:1:NO:2000000000000000000".to_string()]
        );
    }

    #[tokio::test]
    async fn test_place_bet_rejected_after_close() {
        let (app, market) = test_app(FakeMarket::with_pools(vec![pool(1, now() - 10)]), true);

        let (status, body) = post(
            &app,
            "/api/pools/1/bets",
            json!({ "side": "yes", "amount": "2" }),
        )
        .await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["error"], "Pool 1 is Closed (expected Live)");

        let (status, _) = post(
            &app,
            "/api/pools/1/bets",
            json!({ "side": "maybe", "amount": "2" }),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, _) = post(
            &app,
            "/api/pools/7/bets",
            json!({ "side": "yes", "amount": "2" }),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        assert!(market.recorded_writes().is_empty());
    }

    #[tokio::test]
    async fn test_resolution_flow_actions() {
        let ended = pool(1, now() - 600);
        let pending = PoolSnapshot {
            id: 2,
            request_submitted: true,
            request_time: now(),
            ..ended.clone()
        };
        let settleable = PoolSnapshot {
            id: 3,
            request_submitted: true,
            request_time: now() - 300,
            ..ended.clone()
        };
        let market = FakeMarket::with_pools(vec![ended, pending, settleable, resolved(4, Side::Yes)]);
        let (app, market) = test_app(market, true);

        let (status, _) = post(&app, "/api/pools/1/request-resolution", json!({})).await;
        assert_eq!(status, StatusCode::OK);

        let (status, _) = post(&app, "/api/pools/2/settle", json!({})).await;
        assert_eq!(status, StatusCode::CONFLICT);

        let (status, _) = post(&app, "/api/pools/3/settle", json!({})).await;
        assert_eq!(status, StatusCode::OK);

        let (status, _) = post(&app, "/api/pools/3/claim", json!({})).await;
        assert_eq!(status, StatusCode::CONFLICT);

        let (status, _) = post(&app, "/api/pools/4/claim", json!({})).await;
        assert_eq!(status, StatusCode::OK);

        let (status, _) = post(&app, "/api/pools/4/claim-creator", json!({})).await;
        assert_eq!(status, StatusCode::OK);

        assert_eq!(
            market.recorded_writes(),
            vec![
                "requestResolution:1".to_string(),
                "settleResolution:3".to_string(),
                "claim:4".to_string(),
                "claimCreatorRewards:4".to_string(),
            ]
        );
    }
}
