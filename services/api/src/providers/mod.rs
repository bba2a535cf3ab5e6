//! Upstream NFT data provider clients
//!
//! Each client issues plain HTTP GETs against one third-party indexer and
//! returns that provider's native JSON shape. Handlers depend on the trait
//! seams defined here so aggregation logic can be exercised against stubs.

use async_trait::async_trait;
use std::fmt;
use thiserror::Error;

pub mod moralis;
pub mod reservoir;

pub use moralis::MoralisClient;
pub use reservoir::ReservoirClient;

/// Upstream provider identifiers, used in error reporting and logs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Provider {
    Reservoir,
    Moralis,
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Provider::Reservoir => write!(f, "reservoir"),
            Provider::Moralis => write!(f, "moralis"),
        }
    }
}

/// Error returned by an upstream provider call
#[derive(Error, Debug)]
#[error("{provider}: {kind}")]
pub struct UpstreamError {
    pub provider: Provider,
    pub kind: UpstreamErrorKind,
}

/// Failure modes of an upstream provider call
#[derive(Error, Debug)]
pub enum UpstreamErrorKind {
    /// Non-2xx HTTP status from the provider
    #[error("unexpected status {0}")]
    Status(u16),

    /// Connection or transport failure
    #[error("network error: {0}")]
    Network(#[source] reqwest::Error),

    /// Response body did not match the expected shape
    #[error("invalid response body: {0}")]
    Decode(#[source] reqwest::Error),
}

impl UpstreamError {
    pub fn status(provider: Provider, status: u16) -> Self {
        Self {
            provider,
            kind: UpstreamErrorKind::Status(status),
        }
    }

    pub fn network(provider: Provider, source: reqwest::Error) -> Self {
        Self {
            provider,
            kind: UpstreamErrorKind::Network(source),
        }
    }

    pub fn decode(provider: Provider, source: reqwest::Error) -> Self {
        Self {
            provider,
            kind: UpstreamErrorKind::Decode(source),
        }
    }
}

/// Query parameters accepted by the collections endpoint
#[derive(Debug, Clone, Default)]
pub struct CollectionQuery {
    pub limit: u32,
    pub name: Option<String>,
    pub slug: Option<String>,
    pub contract: Option<String>,
}

/// Source of collection and token data (Reservoir)
#[async_trait]
pub trait CollectionSource: Send + Sync {
    /// Fetch collections matching the query
    async fn collections(
        &self,
        query: &CollectionQuery,
    ) -> Result<reservoir::CollectionsResponse, UpstreamError>;

    /// Fetch tokens belonging to one collection
    async fn tokens(
        &self,
        collection_id: &str,
        limit: u32,
    ) -> Result<reservoir::TokensResponse, UpstreamError>;

    /// Fetch collections ordered by one-day trading volume
    async fn top_volume_collections(
        &self,
        limit: u32,
    ) -> Result<reservoir::CollectionsResponse, UpstreamError>;
}

/// Source of per-contract NFT data (Moralis)
#[async_trait]
pub trait ContractNftSource: Send + Sync {
    /// Fetch NFTs minted by one contract
    async fn contract_nfts(
        &self,
        contract_address: &str,
        limit: u32,
    ) -> Result<moralis::ContractNftsResponse, UpstreamError>;
}
