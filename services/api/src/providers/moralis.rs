//! Moralis API client
//!
//! Fetches the NFTs minted by one contract. Moralis returns token metadata
//! both as a raw JSON string (`metadata`) and, when requested, in a
//! pre-parsed `normalized_metadata` object; the normalizer prefers the
//! latter and falls back to parsing the former.

use async_trait::async_trait;
use reqwest::header::{ACCEPT, USER_AGENT};
use serde::Deserialize;

use super::{ContractNftSource, Provider, UpstreamError};

const USER_AGENT_VALUE: &str = "nft-market/0.1";

/// Response of `GET /nft/{address}`
#[derive(Debug, Clone, Deserialize)]
pub struct ContractNftsResponse {
    #[serde(default)]
    pub result: Vec<MoralisNft>,
    pub cursor: Option<String>,
    pub page: Option<i64>,
    pub page_size: Option<i64>,
}

/// One NFT as returned by Moralis (snake_case fields)
#[derive(Debug, Clone, Deserialize)]
pub struct MoralisNft {
    pub token_address: Option<String>,
    pub token_id: Option<String>,
    pub owner_of: Option<String>,
    pub name: Option<String>,
    /// Raw metadata blob as a JSON string, possibly malformed
    pub metadata: Option<String>,
    pub normalized_metadata: Option<NormalizedMetadata>,
}

/// Pre-parsed metadata provided with `normalizeMetadata=true`
#[derive(Debug, Clone, Deserialize)]
pub struct NormalizedMetadata {
    pub name: Option<String>,
    pub description: Option<String>,
    pub image: Option<String>,
    pub attributes: Option<Vec<MoralisAttribute>>,
}

/// Token attribute in Moralis' `trait_type`/`value` shape
#[derive(Debug, Clone, Deserialize)]
pub struct MoralisAttribute {
    pub trait_type: Option<String>,
    pub value: Option<serde_json::Value>,
    /// Share of tokens in the collection carrying this trait
    pub percentage: Option<f64>,
}

/// HTTP client for the Moralis API
#[derive(Clone)]
pub struct MoralisClient {
    http: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
}

impl MoralisClient {
    pub fn new(base_url: String, api_key: Option<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url,
            api_key,
        }
    }
}

#[async_trait]
impl ContractNftSource for MoralisClient {
    async fn contract_nfts(
        &self,
        contract_address: &str,
        limit: u32,
    ) -> Result<ContractNftsResponse, UpstreamError> {
        let url = format!("{}/nft/{}", self.base_url, contract_address);
        let params = [
            ("chain", "eth".to_string()),
            ("format", "decimal".to_string()),
            ("limit", limit.clamp(1, 100).to_string()),
            ("normalizeMetadata", "true".to_string()),
        ];

        let mut request = self
            .http
            .get(&url)
            .header(ACCEPT, "application/json")
            .header(USER_AGENT, USER_AGENT_VALUE)
            .query(&params);

        if let Some(key) = &self.api_key {
            request = request.header("X-API-Key", key);
        }

        let response = request
            .send()
            .await
            .map_err(|e| UpstreamError::network(Provider::Moralis, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(UpstreamError::status(Provider::Moralis, status.as_u16()));
        }

        response
            .json::<ContractNftsResponse>()
            .await
            .map_err(|e| UpstreamError::decode(Provider::Moralis, e))
    }
}
