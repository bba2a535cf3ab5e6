//! Application state shared across handlers

use axum::extract::FromRef;
use sqlx::PgPool;
use std::sync::Arc;

use crate::config::ApiConfig;
use crate::providers::{CollectionSource, ContractNftSource};
use crate::repositories::{NftRepository, UserRepository};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub db_pool: PgPool,
    pub config: Arc<ApiConfig>,
    pub user_repository: UserRepository,
    pub nft_repository: NftRepository,
    pub market: MarketState,
}

/// Provider clients used by the read-only aggregation routes. Kept behind
/// trait objects so tests can drive the handlers with stub providers.
#[derive(Clone)]
pub struct MarketState {
    pub collections: Arc<dyn CollectionSource>,
    pub contract_nfts: Arc<dyn ContractNftSource>,
}

impl FromRef<AppState> for MarketState {
    fn from_ref(state: &AppState) -> Self {
        state.market.clone()
    }
}
