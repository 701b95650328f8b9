//! Yield estimate for a pool that has not been created yet

use axum::{
    extract::{Query, State},
    response::Json,
    routing::get,
    Router,
};
use noloss_core::{CoreError, YieldProjection};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use super::current_apy;
use crate::error::{ApiError, ApiResult};
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct EstimateQuery {
    /// Seed amount in whole tokens
    pub seed: String,
    /// Pool duration in days
    pub days: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EstimateResponse {
    pub seed: Decimal,
    pub days: Decimal,
    /// APY the estimate was computed with
    pub apy: Decimal,
    pub projection: YieldProjection,
}

async fn estimate(
    State(state): State<AppState>,
    Query(query): Query<EstimateQuery>,
) -> ApiResult<Json<EstimateResponse>> {
    let seed = parse_decimal("seed", &query.seed)?;
    let days = parse_decimal("days", &query.days)?;
    let apy = current_apy(&state).await;

    let projection = state
        .projector
        .estimate_new_pool(seed, days, apy)
        .map_err(|e| match e {
            CoreError::Overflow(_) => {
                ApiError::bad_request(format!("Seed or duration out of range: {}", e))
            }
            other => ApiError::Core(other),
        })?;

    Ok(Json(EstimateResponse {
        seed,
        days,
        apy: state.projector.effective_apy(apy),
        projection,
    }))
}

fn parse_decimal(field: &str, raw: &str) -> ApiResult<Decimal> {
    Decimal::from_str(raw.trim())
        .map_err(|_| ApiError::bad_request(format!("Invalid {}: {:?}", field, raw)))
}

/// Create estimate routes
pub fn routes() -> Router<AppState> {
    Router::new().route("/estimate", get(estimate))
}

#[cfg(test)]
mod tests {
    use super::super::testing::*;
    use axum::http::StatusCode;
    use rust_decimal_macros::dec;

    #[tokio::test]
    async fn test_estimate_uses_fallback_apy() {
        let (app, _) = test_app(FakeMarket::default(), false);

        let (status, body) = get(&app, "/api/estimate?seed=100&days=365").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["apy"], "3.5");
        assert_eq!(body["projection"]["totalYield"], "3.5");
        assert_eq!(body["projection"]["prizePool"], "2.1");
        assert_eq!(body["projection"]["creatorReward"], "1.4");
    }

    #[tokio::test]
    async fn test_estimate_with_live_apy() {
        let mut market = FakeMarket::default();
        market.apy = Some(dec!(5));
        let (app, _) = test_app(market, false);

        let (_, body) = get(&app, "/api/estimate?seed=1000&days=73").await;
        assert_eq!(body["apy"], "5");
        assert_eq!(body["projection"]["totalYield"], "10");
        assert_eq!(body["projection"]["prizePool"], "6");
    }

    #[tokio::test]
    async fn test_estimate_zero_and_invalid() {
        let (app, _) = test_app(FakeMarket::default(), false);

        let (_, body) = get(&app, "/api/estimate?seed=0&days=30").await;
        assert_eq!(body["projection"]["totalYield"], "0");

        let (status, body) = get(&app, "/api/estimate?seed=lots&days=30").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Invalid seed: \"lots\"");

        let (status, _) = get(&app, "/api/estimate?seed=10").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_estimate_out_of_range_is_bad_request() {
        let (app, _) = test_app(FakeMarket::default(), false);

        let (status, body) = get(
            &app,
            "/api/estimate?seed=79228162514264337593543950335&days=365",
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].as_str().unwrap().contains("out of range"));

        let (status, _) = get(
            &app,
            "/api/estimate?seed=1000&days=79228162514264337593543950335",
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }
}
