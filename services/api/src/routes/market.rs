//! Read-only aggregation routes over the upstream NFT data providers
//!
//! These handlers proxy one or more provider calls, normalize the results
//! and return the canonical envelope. They have no side effects.

use axum::{
    Json,
    extract::{Path, Query, State},
};
use futures::stream::{self, StreamExt};
use serde::Deserialize;
use std::sync::Arc;
use tracing::warn;

use crate::error::ApiError;
use crate::models::market::{
    CollectionsEnvelope, ContractCollectionEnvelope, Pagination, Token, TokensEnvelope,
};
use crate::normalize::{normalize_collection, normalize_contract_nft, normalize_token};
use crate::providers::reservoir::TokensResponse;
use crate::providers::{CollectionQuery, UpstreamError};
use crate::state::MarketState;

const DEFAULT_COLLECTION_LIMIT: u32 = 12;
const DEFAULT_TOKEN_LIMIT: u32 = 20;
const DEFAULT_TRENDING_LIMIT: u32 = 10;

/// How many top-volume collections the trending route samples
const TRENDING_SAMPLE: u32 = 10;
/// How many tokens each sampled collection contributes
const TRENDING_TOKENS_PER_COLLECTION: usize = 2;
/// Upper bound on concurrent per-collection token fetches
const TRENDING_FANOUT: usize = 4;

/// Contract backing the fixed-collection showcase route
pub const DOODLES_CONTRACT: &str = "0x8a90cab2b38dba80c64b7734e58ee1db38b8992e";

/// Query parameters of the collections listing
#[derive(Debug, Default, Deserialize)]
pub struct CollectionsQuery {
    pub limit: Option<u32>,
    pub name: Option<String>,
    pub slug: Option<String>,
}

/// Query parameter shared by the token-listing routes
#[derive(Debug, Default, Deserialize)]
pub struct LimitQuery {
    pub limit: Option<u32>,
}

/// `GET /api/nfts` — normalized Reservoir collections
pub async fn list_collections(
    State(market): State<MarketState>,
    Query(query): Query<CollectionsQuery>,
) -> Result<Json<CollectionsEnvelope>, ApiError> {
    let request = CollectionQuery {
        limit: query.limit.unwrap_or(DEFAULT_COLLECTION_LIMIT).clamp(1, 20),
        name: query.name,
        slug: query.slug,
        contract: None,
    };

    let response = market.collections.collections(&request).await?;
    let collections = response
        .collections
        .iter()
        .enumerate()
        .map(|(index, collection)| normalize_collection(collection, index))
        .collect();

    Ok(Json(CollectionsEnvelope {
        collections,
        pagination: Pagination::from_cursor(response.continuation),
    }))
}

/// `GET /api/nfts/:collection_id/tokens` — normalized tokens of one collection
pub async fn list_collection_tokens(
    State(market): State<MarketState>,
    Path(collection_id): Path<String>,
    Query(query): Query<LimitQuery>,
) -> Result<Json<TokensEnvelope>, ApiError> {
    let limit = query.limit.unwrap_or(DEFAULT_TOKEN_LIMIT).clamp(1, 100);
    let response = market.collections.tokens(&collection_id, limit).await?;

    let tokens = response
        .tokens
        .iter()
        .enumerate()
        .filter_map(|(index, entry)| normalize_token(entry, index))
        .collect();

    Ok(Json(TokensEnvelope {
        tokens,
        pagination: Pagination::from_cursor(response.continuation),
    }))
}

/// `GET /api/trending-nfts` — a slice of tokens from the highest-volume
/// collections. Token fetches fan out with bounded concurrency but keep
/// top-volume order; a failing collection is skipped rather than failing
/// the whole response.
pub async fn trending_tokens(
    State(market): State<MarketState>,
    Query(query): Query<LimitQuery>,
) -> Result<Json<TokensEnvelope>, ApiError> {
    let limit = query.limit.unwrap_or(DEFAULT_TRENDING_LIMIT).clamp(1, 50) as usize;

    let top = market
        .collections
        .top_volume_collections(TRENDING_SAMPLE)
        .await?;
    let ids: Vec<String> = top
        .collections
        .iter()
        .filter_map(|collection| collection.id.clone())
        .collect();

    let source = Arc::clone(&market.collections);
    let results: Vec<(String, Result<TokensResponse, UpstreamError>)> = stream::iter(
        ids.into_iter().map(|id| {
            let source = Arc::clone(&source);
            async move {
                let result = source
                    .tokens(&id, TRENDING_TOKENS_PER_COLLECTION as u32)
                    .await;
                (id, result)
            }
        }),
    )
    .buffered(TRENDING_FANOUT)
    .collect()
    .await;

    Ok(Json(TokensEnvelope {
        tokens: merge_trending(results, limit),
        pagination: Pagination::none(),
    }))
}

/// Concatenate per-collection token fetches, skipping failed collections,
/// and truncate to the requested limit
fn merge_trending(
    results: Vec<(String, Result<TokensResponse, UpstreamError>)>,
    limit: usize,
) -> Vec<Token> {
    let mut tokens = Vec::new();

    for (collection_id, result) in results {
        match result {
            Ok(response) => {
                for entry in response.tokens.iter().take(TRENDING_TOKENS_PER_COLLECTION) {
                    if let Some(token) = normalize_token(entry, tokens.len()) {
                        tokens.push(token);
                    }
                }
            }
            Err(e) => warn!("Skipping trending collection {}: {}", collection_id, e),
        }
    }

    tokens.truncate(limit);
    tokens
}

/// `GET /api/doodles-collection` — Moralis tokens for the Doodles contract
/// plus Reservoir collection metadata
pub async fn doodles_collection(
    State(market): State<MarketState>,
    Query(query): Query<LimitQuery>,
) -> Result<Json<ContractCollectionEnvelope>, ApiError> {
    let limit = query.limit.unwrap_or(DEFAULT_TOKEN_LIMIT).clamp(1, 100);

    let nfts = market
        .contract_nfts
        .contract_nfts(DOODLES_CONTRACT, limit)
        .await?;
    let metadata = market
        .collections
        .collections(&CollectionQuery {
            limit: 1,
            contract: Some(DOODLES_CONTRACT.to_string()),
            ..CollectionQuery::default()
        })
        .await?;

    let tokens = nfts
        .result
        .iter()
        .enumerate()
        .map(|(index, nft)| normalize_contract_nft(nft, index))
        .collect();
    let collection = metadata
        .collections
        .first()
        .map(|collection| normalize_collection(collection, 0));

    Ok(Json(ContractCollectionEnvelope {
        collection,
        tokens,
        pagination: Pagination::from_cursor(nfts.cursor),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::moralis::ContractNftsResponse;
    use crate::providers::reservoir::CollectionsResponse;
    use crate::providers::{CollectionSource, ContractNftSource, Provider};
    use async_trait::async_trait;
    use serde_json::json;
    use std::collections::{HashMap, HashSet};

    /// Stub provider backed by canned responses
    #[derive(Default)]
    struct StubProvider {
        collections: Option<CollectionsResponse>,
        tokens_by_collection: HashMap<String, TokensResponse>,
        failing_collections: HashSet<String>,
        contract_nfts: Option<ContractNftsResponse>,
    }

    #[async_trait]
    impl CollectionSource for StubProvider {
        async fn collections(
            &self,
            _query: &CollectionQuery,
        ) -> Result<CollectionsResponse, UpstreamError> {
            self.collections
                .clone()
                .ok_or_else(|| UpstreamError::status(Provider::Reservoir, 500))
        }

        async fn tokens(
            &self,
            collection_id: &str,
            _limit: u32,
        ) -> Result<TokensResponse, UpstreamError> {
            if self.failing_collections.contains(collection_id) {
                return Err(UpstreamError::status(Provider::Reservoir, 502));
            }
            self.tokens_by_collection
                .get(collection_id)
                .cloned()
                .ok_or_else(|| UpstreamError::status(Provider::Reservoir, 404))
        }

        async fn top_volume_collections(
            &self,
            _limit: u32,
        ) -> Result<CollectionsResponse, UpstreamError> {
            self.collections
                .clone()
                .ok_or_else(|| UpstreamError::status(Provider::Reservoir, 500))
        }
    }

    #[async_trait]
    impl ContractNftSource for StubProvider {
        async fn contract_nfts(
            &self,
            _contract_address: &str,
            _limit: u32,
        ) -> Result<ContractNftsResponse, UpstreamError> {
            self.contract_nfts
                .clone()
                .ok_or_else(|| UpstreamError::status(Provider::Moralis, 500))
        }
    }

    fn market_state(provider: StubProvider) -> MarketState {
        let provider = Arc::new(provider);
        MarketState {
            collections: provider.clone(),
            contract_nfts: provider,
        }
    }

    fn azuki_collections() -> CollectionsResponse {
        serde_json::from_value(json!({
            "collections": [{
                "id": "0xed5af388653567af2f388e6224dc7c4b3241c544",
                "slug": "azuki",
                "name": "Azuki",
                "image": "https://img.reservoir.tools/images/azuki.png",
                "primaryContract": "0xed5af388653567af2f388e6224dc7c4b3241c544",
                "tokenCount": "10000",
                "floorAsk": { "price": { "amount": { "native": 1.5 } } }
            }],
            "continuation": null
        }))
        .unwrap()
    }

    fn tokens_response(collection: &str, count: usize) -> TokensResponse {
        let tokens: Vec<_> = (0..count)
            .map(|i| {
                json!({
                    "token": {
                        "contract": collection,
                        "tokenId": i.to_string(),
                        "name": format!("Token #{}", i)
                    }
                })
            })
            .collect();
        serde_json::from_value(json!({ "tokens": tokens })).unwrap()
    }

    #[tokio::test]
    async fn collections_are_normalized_into_envelope() {
        let state = market_state(StubProvider {
            collections: Some(azuki_collections()),
            ..StubProvider::default()
        });

        let Json(envelope) = list_collections(
            State(state),
            Query(CollectionsQuery {
                limit: Some(2),
                name: Some("Azuki".to_string()),
                slug: None,
            }),
        )
        .await
        .unwrap();

        assert_eq!(envelope.collections.len(), 1);
        assert_eq!(envelope.collections[0].name, "Azuki");
        assert_eq!(envelope.collections[0].floor_price, Some(1.5));
        assert!(!envelope.pagination.has_next_page);
        assert!(envelope.pagination.cursor.is_none());

        // The wire shape is camelCase.
        let body = serde_json::to_value(&envelope).unwrap();
        assert_eq!(body["collections"][0]["floorPrice"], json!(1.5));
        assert_eq!(body["pagination"]["hasNextPage"], json!(false));
        assert_eq!(body["pagination"]["cursor"], json!(null));
    }

    #[tokio::test]
    async fn upstream_failure_becomes_api_error() {
        let state = market_state(StubProvider::default());

        let result =
            list_collections(State(state), Query(CollectionsQuery::default())).await;
        assert!(matches!(result, Err(ApiError::Upstream(_))));
    }

    #[tokio::test]
    async fn collection_tokens_carry_cursor_pagination() {
        let mut provider = StubProvider::default();
        let mut response = tokens_response("0xabc", 3);
        response.continuation = Some("cursor-1".to_string());
        provider
            .tokens_by_collection
            .insert("0xabc".to_string(), response);

        let Json(envelope) = list_collection_tokens(
            State(market_state(provider)),
            Path("0xabc".to_string()),
            Query(LimitQuery::default()),
        )
        .await
        .unwrap();

        assert_eq!(envelope.tokens.len(), 3);
        assert!(envelope.pagination.has_next_page);
        assert_eq!(envelope.pagination.cursor.as_deref(), Some("cursor-1"));
    }

    fn trending_provider() -> StubProvider {
        let collections = serde_json::from_value(json!({
            "collections": (0..10).map(|i| json!({
                "id": format!("0xc{}", i),
                "name": format!("Collection {}", i)
            })).collect::<Vec<_>>()
        }))
        .unwrap();

        let mut provider = StubProvider {
            collections: Some(collections),
            ..StubProvider::default()
        };
        for i in 0..10 {
            provider
                .tokens_by_collection
                .insert(format!("0xc{}", i), tokens_response(&format!("0xc{}", i), 2));
        }
        provider
    }

    #[tokio::test]
    async fn trending_truncates_to_limit() {
        let Json(envelope) = trending_tokens(
            State(market_state(trending_provider())),
            Query(LimitQuery { limit: Some(5) }),
        )
        .await
        .unwrap();

        // Ten collections with two tokens each are available.
        assert_eq!(envelope.tokens.len(), 5);
        assert!(!envelope.pagination.has_next_page);
    }

    #[tokio::test]
    async fn trending_preserves_top_volume_order() {
        let Json(envelope) = trending_tokens(
            State(market_state(trending_provider())),
            Query(LimitQuery { limit: Some(50) }),
        )
        .await
        .unwrap();

        // Concurrent fetches must not reorder the response: tokens appear
        // grouped by collection, in the order the volume ranking returned.
        let ids: Vec<&str> = envelope.tokens.iter().map(|t| t.id.as_str()).collect();
        let expected: Vec<String> = (0..10)
            .flat_map(|c| (0..2).map(move |t| format!("0xc{}:{}", c, t)))
            .collect();
        assert_eq!(ids, expected);
    }

    #[tokio::test]
    async fn trending_tolerates_partial_collection_failure() {
        let mut provider = trending_provider();
        provider.failing_collections.insert("0xc0".to_string());
        provider.failing_collections.insert("0xc1".to_string());

        let Json(envelope) = trending_tokens(
            State(market_state(provider)),
            Query(LimitQuery { limit: Some(50) }),
        )
        .await
        .unwrap();

        // Eight surviving collections, two tokens each.
        assert_eq!(envelope.tokens.len(), 16);
    }

    #[test]
    fn merge_trending_caps_tokens_per_collection() {
        let oversized = vec![("0xabc".to_string(), Ok(tokens_response("0xabc", 5)))];
        let tokens = merge_trending(oversized, 50);
        assert_eq!(tokens.len(), TRENDING_TOKENS_PER_COLLECTION);
    }

    #[tokio::test]
    async fn doodles_route_merges_tokens_and_metadata() {
        let contract_nfts = serde_json::from_value(json!({
            "cursor": "next-page",
            "result": [{
                "token_address": DOODLES_CONTRACT,
                "token_id": "42",
                "normalized_metadata": {
                    "name": "Doodle #42",
                    "image": "ipfs://QmSo1n/42.png"
                }
            }]
        }))
        .unwrap();

        let doodles_metadata = serde_json::from_value(json!({
            "collections": [{
                "id": DOODLES_CONTRACT,
                "name": "Doodles",
                "floorAsk": { "price": { "amount": { "native": 2.9 } } }
            }]
        }))
        .unwrap();

        let Json(envelope) = doodles_collection(
            State(market_state(StubProvider {
                collections: Some(doodles_metadata),
                contract_nfts: Some(contract_nfts),
                ..StubProvider::default()
            })),
            Query(LimitQuery::default()),
        )
        .await
        .unwrap();

        let collection = envelope.collection.unwrap();
        assert_eq!(collection.name, "Doodles");
        assert_eq!(collection.floor_price, Some(2.9));
        assert_eq!(envelope.tokens.len(), 1);
        assert_eq!(
            envelope.tokens[0].image,
            "https://ipfs.io/ipfs/QmSo1n/42.png"
        );
        assert!(envelope.pagination.has_next_page);
    }
}
