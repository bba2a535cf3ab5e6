use anyhow::Result;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::EnvFilter;

mod config;
mod error;
mod middleware;
mod models;
mod normalize;
mod providers;
mod repositories;
mod routes;
mod state;
mod uploads;

use common::database::{DatabaseConfig, init_pool, run_migrations};
use config::ApiConfig;
use providers::{MoralisClient, ReservoirClient};
use repositories::{NftRepository, UserRepository};
use state::{AppState, MarketState};

pub static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!();

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    info!("Starting marketplace API service");

    let config = ApiConfig::from_env();

    let db_config = DatabaseConfig::from_env()?;
    let pool = init_pool(&db_config).await?;
    run_migrations(&pool, &MIGRATOR).await?;

    if common::database::health_check(&pool).await? {
        info!("Database connection successful");
    } else {
        anyhow::bail!("Failed to connect to database");
    }

    tokio::fs::create_dir_all(&config.upload_dir).await?;

    let reservoir = ReservoirClient::new(
        config.reservoir_base_url.clone(),
        config.reservoir_api_key.clone(),
    );
    let moralis = MoralisClient::new(
        config.moralis_base_url.clone(),
        config.moralis_api_key.clone(),
    );

    let bind_addr = config.bind_addr.clone();
    let app_state = AppState {
        db_pool: pool.clone(),
        config: Arc::new(config),
        user_repository: UserRepository::new(pool.clone()),
        nft_repository: NftRepository::new(pool),
        market: MarketState {
            collections: Arc::new(reservoir),
            contract_nfts: Arc::new(moralis),
        },
    };

    let app = routes::create_router(app_state);

    let listener = TcpListener::bind(&bind_addr).await?;
    info!("Marketplace API listening on {}", bind_addr);

    axum::serve(listener, app).await?;

    Ok(())
}
