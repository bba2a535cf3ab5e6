//! Reservoir API client
//!
//! Read-only access to the Reservoir collections and tokens endpoints.
//! Responses are kept in Reservoir's native shape; the normalizer maps them
//! into the canonical records the routes return.

use async_trait::async_trait;
use reqwest::header::{ACCEPT, USER_AGENT};
use serde::Deserialize;
use serde::de::DeserializeOwned;

use super::{CollectionQuery, CollectionSource, Provider, UpstreamError};

const USER_AGENT_VALUE: &str = "nft-market/0.1";

/// Response of `GET /collections/v7`
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CollectionsResponse {
    #[serde(default)]
    pub collections: Vec<ReservoirCollection>,
    pub continuation: Option<String>,
}

/// One collection as returned by Reservoir
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReservoirCollection {
    pub id: Option<String>,
    pub name: Option<String>,
    pub slug: Option<String>,
    pub image: Option<String>,
    pub primary_contract: Option<String>,
    /// Token count comes back as a decimal string
    pub token_count: Option<String>,
    pub owner_count: Option<i64>,
    pub floor_ask: Option<PriceQuote>,
    pub volume: Option<CollectionVolume>,
}

impl ReservoirCollection {
    /// Native floor price, when a floor ask exists
    pub fn floor_price(&self) -> Option<f64> {
        self.floor_ask.as_ref().and_then(PriceQuote::native)
    }
}

/// Trading volume buckets keyed by window length
#[derive(Debug, Clone, Deserialize)]
pub struct CollectionVolume {
    #[serde(rename = "1day")]
    pub one_day: Option<f64>,
}

/// A priced ask or sale
#[derive(Debug, Clone, Deserialize)]
pub struct PriceQuote {
    pub price: Option<Price>,
}

impl PriceQuote {
    pub fn native(&self) -> Option<f64> {
        self.price.as_ref()?.amount.as_ref()?.native
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Price {
    pub amount: Option<PriceAmount>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PriceAmount {
    pub native: Option<f64>,
    pub usd: Option<f64>,
}

/// Response of `GET /tokens/v7`
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokensResponse {
    #[serde(default)]
    pub tokens: Vec<TokenEntry>,
    pub continuation: Option<String>,
}

/// One token entry, pairing token metadata with market data
#[derive(Debug, Clone, Deserialize)]
pub struct TokenEntry {
    pub token: Option<ReservoirToken>,
    pub market: Option<TokenMarket>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReservoirToken {
    pub token_id: Option<String>,
    pub name: Option<String>,
    pub image: Option<String>,
    pub contract: Option<String>,
    pub owner: Option<String>,
    pub rarity: Option<f64>,
    pub rarity_rank: Option<i64>,
    pub attributes: Option<Vec<ReservoirAttribute>>,
    pub last_sale: Option<PriceQuote>,
}

/// Token attribute in Reservoir's `key`/`value` shape
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReservoirAttribute {
    pub key: Option<String>,
    pub value: Option<serde_json::Value>,
    pub token_count: Option<i64>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenMarket {
    pub floor_ask: Option<PriceQuote>,
}

/// HTTP client for the Reservoir API
#[derive(Clone)]
pub struct ReservoirClient {
    http: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
}

impl ReservoirClient {
    pub fn new(base_url: String, api_key: Option<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url,
            api_key,
        }
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, UpstreamError> {
        let url = format!("{}{}", self.base_url, path);
        let mut request = self
            .http
            .get(&url)
            .header(ACCEPT, "application/json")
            .header(USER_AGENT, USER_AGENT_VALUE)
            .query(query);

        if let Some(key) = &self.api_key {
            request = request.header("x-api-key", key);
        }

        let response = request
            .send()
            .await
            .map_err(|e| UpstreamError::network(Provider::Reservoir, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(UpstreamError::status(Provider::Reservoir, status.as_u16()));
        }

        response
            .json::<T>()
            .await
            .map_err(|e| UpstreamError::decode(Provider::Reservoir, e))
    }
}

#[async_trait]
impl CollectionSource for ReservoirClient {
    async fn collections(
        &self,
        query: &CollectionQuery,
    ) -> Result<CollectionsResponse, UpstreamError> {
        let mut params = vec![("limit", query.limit.clamp(1, 20).to_string())];
        if let Some(name) = &query.name {
            params.push(("name", name.clone()));
        }
        if let Some(slug) = &query.slug {
            params.push(("slug", slug.clone()));
        }
        if let Some(contract) = &query.contract {
            params.push(("contract", contract.clone()));
        }

        self.get_json("/collections/v7", &params).await
    }

    async fn tokens(
        &self,
        collection_id: &str,
        limit: u32,
    ) -> Result<TokensResponse, UpstreamError> {
        let params = vec![
            ("collection", collection_id.to_string()),
            ("limit", limit.clamp(1, 100).to_string()),
            ("includeAttributes", "true".to_string()),
            ("includeLastSale", "true".to_string()),
        ];

        self.get_json("/tokens/v7", &params).await
    }

    async fn top_volume_collections(
        &self,
        limit: u32,
    ) -> Result<CollectionsResponse, UpstreamError> {
        let params = vec![
            ("sortBy", "1DayVolume".to_string()),
            ("limit", limit.clamp(1, 20).to_string()),
        ];

        self.get_json("/collections/v7", &params).await
    }
}
