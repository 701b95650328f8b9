//! Alloy-backed MarketController client
//!
//! Reads go straight to `eth_call`. Writes are signed by the optional server
//! wallet, serialized so allowance checks and nonces never interleave, and
//! each transaction is awaited to confirmation before the next one starts.

use alloy::network::Ethereum;
use alloy::primitives::{Address, U256};
use alloy::providers::{DynProvider, PendingTransactionBuilder, Provider, ProviderBuilder};
use async_trait::async_trait;
use noloss_core::{apy_from_liquidity_rate, PoolMetrics, PoolSnapshot, Side, UserBet};
use rust_decimal::Decimal;
use std::str::FromStr;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::adapter::{bet_from_raw, metrics_from_raw, pool_from_raw, u256_to_u128};
use crate::config::ChainConfig;
use crate::contracts::{IAavePool, IMarketController, IERC20};
use crate::error::{ChainError, ChainResult};
use crate::market::{MarketReader, MarketWriter, TxHash};
use crate::wallet::ServerWallet;

type MarketInstance = IMarketController::IMarketControllerInstance<DynProvider>;
type TokenInstance = IERC20::IERC20Instance<DynProvider>;

/// JSON-RPC client for the pool controller and its token
pub struct RpcMarketClient {
    config: ChainConfig,
    provider: DynProvider,
    wallet: Option<ServerWallet>,
    write_lock: Mutex<()>,
}

impl RpcMarketClient {
    /// Connect to `config.rpc_url`; with a wallet the client can also write
    pub async fn connect(config: ChainConfig, wallet: Option<ServerWallet>) -> ChainResult<Self> {
        let builder = ProviderBuilder::new();
        let provider = match &wallet {
            Some(wallet) => builder
                .wallet(wallet.ethereum_wallet())
                .connect(&config.rpc_url)
                .await
                .map_err(ChainError::rpc)?
                .erased(),
            None => builder
                .connect(&config.rpc_url)
                .await
                .map_err(ChainError::rpc)?
                .erased(),
        };

        info!(
            "Connected to {} (controller {}, writes {})",
            config.rpc_url,
            config.market_controller,
            if wallet.is_some() { "enabled" } else { "disabled" }
        );

        Ok(Self {
            config,
            provider,
            wallet,
            write_lock: Mutex::new(()),
        })
    }

    /// Whether a server wallet is loaded
    pub fn can_write(&self) -> bool {
        self.wallet.is_some()
    }

    /// Address of the server wallet, if any
    pub fn wallet_address(&self) -> Option<String> {
        self.wallet.as_ref().map(|w| w.address_string())
    }

    fn market(&self) -> MarketInstance {
        IMarketController::new(self.config.market_controller, self.provider.clone())
    }

    fn token(&self) -> TokenInstance {
        IERC20::new(self.config.token, self.provider.clone())
    }

    fn signer_address(&self) -> ChainResult<Address> {
        self.wallet
            .as_ref()
            .map(|w| w.address())
            .ok_or(ChainError::WritesDisabled)
    }

    /// Approve the controller for `amount` unless the allowance already covers it
    async fn ensure_allowance(&self, amount: U256) -> ChainResult<()> {
        let owner = self.signer_address()?;
        let spender = self.config.market_controller;
        let token = self.token();

        let current = token
            .allowance(owner, spender)
            .call()
            .await
            .map_err(ChainError::rpc)?;
        debug!("Current allowance: {}", current);

        if current >= amount {
            debug!("Sufficient allowance already exists, skipping approval");
            return Ok(());
        }

        info!("Approving token spending for amount: {}", amount);
        let pending = token.approve(spender, amount).send().await;
        self.confirm("approve", pending).await?;

        let updated = token
            .allowance(owner, spender)
            .call()
            .await
            .map_err(ChainError::rpc)?;
        debug!("New allowance after approval: {}", updated);

        if updated < amount {
            return Err(ChainError::transaction(
                "approve",
                "allowance not set correctly after approval",
            ));
        }
        Ok(())
    }

    /// Wait for a sent transaction and check its receipt status
    async fn confirm(
        &self,
        action: &str,
        pending: Result<PendingTransactionBuilder<Ethereum>, alloy::contract::Error>,
    ) -> ChainResult<TxHash> {
        let pending = pending.map_err(|e| ChainError::transaction(action, e))?;
        let tx_hash = pending.tx_hash().to_string();

        info!("Waiting for {} confirmation: {}", action, tx_hash);
        let receipt = pending
            .with_required_confirmations(self.config.confirmations)
            .get_receipt()
            .await
            .map_err(|e| ChainError::transaction(action, e))?;

        if !receipt.status() {
            warn!("{} reverted: {}", action, tx_hash);
            return Err(ChainError::transaction(action, "transaction reverted"));
        }

        info!("{} confirmed: {}", action, tx_hash);
        Ok(tx_hash)
    }
}

#[async_trait]
impl MarketReader for RpcMarketClient {
    async fn pool_count(&self) -> ChainResult<u64> {
        let count = self
            .market()
            .poolCount()
            .call()
            .await
            .map_err(ChainError::rpc)?;

        count
            .try_into()
            .map_err(|_| ChainError::decode(format!("pool count out of range: {}", count)))
    }

    async fn pool(&self, pool_id: u64) -> ChainResult<Option<PoolSnapshot>> {
        let raw = self
            .market()
            .pools(U256::from(pool_id))
            .call()
            .await
            .map_err(ChainError::rpc)?;

        pool_from_raw(pool_id, raw)
    }

    async fn user_bet(&self, pool_id: u64, user: &str) -> ChainResult<Option<UserBet>> {
        let user = parse_address(user)?;
        let raw = self
            .market()
            .bets(U256::from(pool_id), user)
            .call()
            .await
            .map_err(ChainError::rpc)?;

        bet_from_raw(raw)
    }

    async fn pool_metrics(&self, pool_id: u64) -> ChainResult<Option<PoolMetrics>> {
        let raw = self
            .market()
            .getPoolMetrics(U256::from(pool_id))
            .call()
            .await
            .map_err(ChainError::rpc)?;

        metrics_from_raw(raw).map(Some)
    }

    async fn current_apy(&self) -> ChainResult<Option<Decimal>> {
        let Some(aave_pool) = self.config.aave_pool else {
            return Ok(None);
        };

        let reserve = IAavePool::new(aave_pool, self.provider.clone())
            .getReserveData(self.config.token)
            .call()
            .await
            .map_err(ChainError::rpc)?;

        Ok(apy_from_liquidity_rate(reserve.currentLiquidityRate))
    }

    async fn token_balance(&self, owner: &str) -> ChainResult<u128> {
        let owner = parse_address(owner)?;
        let balance = self
            .token()
            .balanceOf(owner)
            .call()
            .await
            .map_err(ChainError::rpc)?;

        u256_to_u128("balance", balance)
    }
}

#[async_trait]
impl MarketWriter for RpcMarketClient {
    async fn create_pool(
        &self,
        question: &str,
        duration_secs: u64,
        seed_amount: u128,
    ) -> ChainResult<TxHash> {
        let _guard = self.write_lock.lock().await;
        let seed = U256::from(seed_amount);

        self.ensure_allowance(seed).await?;

        info!("Creating pool: {:?} ({}s)", question, duration_secs);
        let market = self.market();
        let pending = market
            .createPool(question.to_string(), U256::from(duration_secs), seed)
            .send()
            .await;
        self.confirm("createPool", pending).await
    }

    async fn place_bet(&self, pool_id: u64, side: Side, amount: u128) -> ChainResult<TxHash> {
        let _guard = self.write_lock.lock().await;
        let amount = U256::from(amount);

        self.ensure_allowance(amount).await?;

        info!("Placing {} bet of {} on pool {}", side, amount, pool_id);
        let market = self.market();
        let pending = market
            .placeBet(U256::from(pool_id), side.as_bool(), amount)
            .send()
            .await;
        self.confirm("placeBet", pending).await
    }

    async fn claim(&self, pool_id: u64) -> ChainResult<TxHash> {
        let _guard = self.write_lock.lock().await;
        self.signer_address()?;

        let market = self.market();
        let pending = market.claim(U256::from(pool_id)).send().await;
        self.confirm("claim", pending).await
    }

    async fn claim_creator_rewards(&self, pool_id: u64) -> ChainResult<TxHash> {
        let _guard = self.write_lock.lock().await;
        self.signer_address()?;

        let market = self.market();
        let pending = market.claimCreatorRewards(U256::from(pool_id)).send().await;
        self.confirm("claimCreatorRewards", pending).await
    }

    async fn request_resolution(&self, pool_id: u64) -> ChainResult<TxHash> {
        let _guard = self.write_lock.lock().await;
        self.signer_address()?;

        let market = self.market();
        let pending = market.requestResolution(U256::from(pool_id)).send().await;
        self.confirm("requestResolution", pending).await
    }

    async fn settle_resolution(&self, pool_id: u64) -> ChainResult<TxHash> {
        let _guard = self.write_lock.lock().await;
        self.signer_address()?;

        let market = self.market();
        let pending = market.settleResolution(U256::from(pool_id)).send().await;
        self.confirm("settleResolution", pending).await
    }
}

fn parse_address(raw: &str) -> ChainResult<Address> {
    Address::from_str(raw.trim()).map_err(|_| ChainError::InvalidAddress(raw.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_address() {
        assert!(parse_address("0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266").is_ok());
        assert!(parse_address(" 0xf39fd6e51aad88f6f4ce6ab8827279cfffb92266 ").is_ok());
        assert!(matches!(
            parse_address("0x742d35"),
            Err(ChainError::InvalidAddress(_))
        ));
    }
}
