//! In-memory market and request helpers for router tests

use async_trait::async_trait;
use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use noloss_chain::{ChainError, ChainResult, MarketReader, MarketWriter, TxHash};
use noloss_core::{PoolMetrics, PoolSnapshot, Side, UserBet, YieldProjector};
use rust_decimal::Decimal;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tower::ServiceExt;

use crate::AppState;

pub const TOKEN: u128 = 1_000_000_000_000_000_000;
pub const CREATOR: &str = "0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266";
pub const BETTOR: &str = "0x70997970C51812dc3A010C7d01b50e0d17dc79C8";
pub const TX_HASH: &str = "0x88df016429689c079f3b2f6ad39fa052532c56795b733da78a91ebe6a713944b";

#[derive(Default)]
pub struct FakeMarket {
    pub pools: Vec<PoolSnapshot>,
    /// Keyed by pool id and lowercase address
    pub bets: HashMap<(u64, String), UserBet>,
    pub metrics: HashMap<u64, PoolMetrics>,
    pub apy: Option<Decimal>,
    pub apy_fails: bool,
    pub balances: HashMap<String, u128>,
    /// Writes received, as `action:pool_id`
    pub writes: Mutex<Vec<String>>,
}

impl FakeMarket {
    pub fn with_pools(pools: Vec<PoolSnapshot>) -> Self {
        Self {
            pools,
            ..Self::default()
        }
    }

    pub fn with_bet(mut self, pool_id: u64, user: &str, bet: UserBet) -> Self {
        self.bets.insert((pool_id, user.to_lowercase()), bet);
        self
    }

    pub fn with_metrics(mut self, pool_id: u64, current_total_yield: u128) -> Self {
        self.metrics.insert(
            pool_id,
            PoolMetrics {
                current_total_yield,
                estimated_winner_prize: 0,
                estimated_creator_fee: 0,
            },
        );
        self
    }

    pub fn recorded_writes(&self) -> Vec<String> {
        self.writes.lock().unwrap().clone()
    }

    fn record(&self, action: &str, pool_id: u64) -> ChainResult<TxHash> {
        self.writes
            .lock()
            .unwrap()
            .push(format!("{}:{}", action, pool_id));
        Ok(TX_HASH.to_string())
    }
}

fn check_address(address: &str) -> ChainResult<String> {
    let valid = address.len() == 42
        && address.starts_with("0x")
        && address[2..].chars().all(|c| c.is_ascii_hexdigit());
    if valid {
        Ok(address.to_lowercase())
    } else {
        Err(ChainError::InvalidAddress(address.to_string()))
    }
}

#[async_trait]
impl MarketReader for FakeMarket {
    async fn pool_count(&self) -> ChainResult<u64> {
        Ok(self.pools.len() as u64)
    }

    async fn pool(&self, pool_id: u64) -> ChainResult<Option<PoolSnapshot>> {
        Ok(self.pools.iter().find(|p| p.id == pool_id).cloned())
    }

    async fn user_bet(&self, pool_id: u64, user: &str) -> ChainResult<Option<UserBet>> {
        let user = check_address(user)?;
        Ok(self.bets.get(&(pool_id, user)).cloned())
    }

    async fn pool_metrics(&self, pool_id: u64) -> ChainResult<Option<PoolMetrics>> {
        Ok(self.metrics.get(&pool_id).cloned())
    }

    async fn current_apy(&self) -> ChainResult<Option<Decimal>> {
        if self.apy_fails {
            return Err(ChainError::rpc("reserve data unavailable"));
        }
        Ok(self.apy)
    }

    async fn token_balance(&self, owner: &str) -> ChainResult<u128> {
        let owner = check_address(owner)?;
        Ok(self.balances.get(&owner).copied().unwrap_or(0))
    }
}

#[async_trait]
impl MarketWriter for FakeMarket {
    async fn create_pool(
        &self,
        question: &str,
        duration_secs: u64,
        seed_amount: u128,
    ) -> ChainResult<TxHash> {
        self.writes.lock().unwrap().push(format!(
            "createPool:{}:{}:{}",
            question, duration_secs, seed_amount
        ));
        Ok(TX_HASH.to_string())
    }

    async fn place_bet(&self, pool_id: u64, side: Side, amount: u128) -> ChainResult<TxHash> {
        self.writes
            .lock()
            .unwrap()
            .push(format!("placeBet:{}:{}:{}", pool_id, side, amount));
        Ok(TX_HASH.to_string())
    }

    async fn claim(&self, pool_id: u64) -> ChainResult<TxHash> {
        self.record("claim", pool_id)
    }

    async fn claim_creator_rewards(&self, pool_id: u64) -> ChainResult<TxHash> {
        self.record("claimCreatorRewards", pool_id)
    }

    async fn request_resolution(&self, pool_id: u64) -> ChainResult<TxHash> {
        self.record("requestResolution", pool_id)
    }

    async fn settle_resolution(&self, pool_id: u64) -> ChainResult<TxHash> {
        self.record("settleResolution", pool_id)
    }
}

/// Pool `id` with 1000 tokens of principal, 100 of them the creator seed
pub fn pool(id: u64, end_time: i64) -> PoolSnapshot {
    PoolSnapshot {
        id,
        creator: CREATOR.to_string(),
        question: format!("Question {}?", id),
        end_time,
        total_shares: 0,
        total_principal: 1_000 * TOKEN,
        creator_principal: 100 * TOKEN,
        yes_principal: 600 * TOKEN,
        no_principal: 300 * TOKEN,
        total_yes_weight: 200,
        total_no_weight: 100,
        resolved: false,
        outcome: Side::No,
        final_total_yield: 0,
        request_submitted: false,
        request_time: 0,
    }
}

pub fn resolved(id: u64, outcome: Side) -> PoolSnapshot {
    PoolSnapshot {
        resolved: true,
        outcome,
        request_submitted: true,
        request_time: 1,
        ..pool(id, 0)
    }
}

pub fn bet(side: Side, principal_tokens: u128, weight: u128) -> UserBet {
    UserBet {
        principal: principal_tokens * TOKEN,
        weight,
        side,
        claimed: false,
    }
}

/// Router over `market`; writes are enabled when `writable`
pub fn test_app(market: FakeMarket, writable: bool) -> (Router, Arc<FakeMarket>) {
    let market = Arc::new(market);
    let writer: Option<Arc<dyn MarketWriter>> = if writable {
        Some(market.clone())
    } else {
        None
    };
    let state = AppState {
        reader: market.clone(),
        writer,
        projector: Arc::new(YieldProjector::default()),
    };
    (crate::app(state), market)
}

pub async fn get(app: &Router, uri: &str) -> (StatusCode, Value) {
    let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
    send(app, request).await
}

pub async fn post(app: &Router, uri: &str, body: Value) -> (StatusCode, Value) {
    let request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    send(app, request).await
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, json)
}
