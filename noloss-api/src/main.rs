//! No-loss Pool API Server
//!
//! HTTP API over the MarketController contract: pool views, positions,
//! yield estimates and, with a server wallet, the pool write actions.

mod error;
mod routes;

use axum::{
    http::{header, Method},
    Router,
};
use noloss_chain::{ChainConfig, MarketReader, MarketWriter, RpcMarketClient, ServerWallet};
use noloss_core::{ProtocolConfig, YieldProjector};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub reader: Arc<dyn MarketReader>,
    /// Write access (optional - requires SERVER_PRIVATE_KEY)
    pub writer: Option<Arc<dyn MarketWriter>>,
    pub projector: Arc<YieldProjector>,
}

/// Build the full router for `state`
pub fn app(state: AppState) -> Router {
    // Configure CORS for frontend
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION]);

    Router::new()
        .nest("/api", routes::api_routes())
        .layer(cors)
        .with_state(state)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env.local file
    if let Err(e) = dotenvy::from_filename(".env.local") {
        // Not an error if the file doesn't exist
        if !matches!(e, dotenvy::Error::Io(_)) {
            eprintln!("Warning: Failed to load .env.local: {}", e);
        }
    }

    // Initialize logging
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,noloss_api=debug")),
        )
        .init();

    info!("Starting No-loss Pool API");

    let protocol = ProtocolConfig::from_env()?;
    info!(
        "Protocol: {}% prize pool / {}% creator, fallback APY {}%, liveness {}s",
        protocol.prize_pool_share,
        protocol.creator_share,
        protocol.fallback_apy,
        protocol.liveness_window_secs
    );

    let chain_config = ChainConfig::from_env()?;
    if chain_config.aave_pool.is_none() {
        info!("AAVE_POOL_ADDRESS not set - projections use the fallback APY");
    }

    let wallet = match ServerWallet::from_env() {
        Ok(wallet) => wallet,
        Err(e) => {
            tracing::warn!("Failed to load server wallet: {}. Write actions disabled.", e);
            None
        }
    };
    if wallet.is_none() {
        info!("No server wallet configured - write endpoints will return 503");
    }

    let client = Arc::new(RpcMarketClient::connect(chain_config, wallet).await?);
    if let Some(address) = client.wallet_address() {
        info!("Write actions enabled, signing as {}", address);
    }
    let writer: Option<Arc<dyn MarketWriter>> = if client.can_write() {
        Some(client.clone())
    } else {
        None
    };

    let state = AppState {
        reader: client,
        writer,
        projector: Arc::new(YieldProjector::new(protocol)),
    };

    let app = app(state);

    // Start server
    let port = std::env::var("SERVER_PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(3001);

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    info!("Server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
