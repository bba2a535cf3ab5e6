//! Canonical records returned by the aggregation routes
//!
//! Every upstream provider shape is mapped into these flat records so the
//! frontend renders one shape regardless of where the data came from. They
//! are ephemeral: constructed per request, never persisted.

use serde::Serialize;

/// A normalized NFT collection
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Collection {
    pub id: String,
    pub name: String,
    pub slug: Option<String>,
    pub image: String,
    pub floor_price: Option<f64>,
    pub one_day_volume: Option<f64>,
    pub token_count: Option<i64>,
    pub owner_count: Option<i64>,
    pub contract_address: Option<String>,
}

/// A normalized NFT token
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Token {
    pub id: String,
    pub name: String,
    pub image: String,
    pub floor_price: Option<f64>,
    pub last_sale_price: Option<f64>,
    pub attributes: Vec<TokenAttribute>,
    pub owner: Option<String>,
    pub contract_address: Option<String>,
    pub rarity_score: Option<f64>,
    pub rank: Option<i64>,
}

/// A normalized token attribute, regardless of provider field names
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TokenAttribute {
    #[serde(rename = "type")]
    pub trait_type: String,
    pub value: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rarity: Option<f64>,
}

/// Cursor pagination attached to every aggregation response
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub has_next_page: bool,
    pub cursor: Option<String>,
}

impl Pagination {
    /// Pagination derived from an upstream continuation cursor
    pub fn from_cursor(cursor: Option<String>) -> Self {
        Self {
            has_next_page: cursor.is_some(),
            cursor,
        }
    }

    /// Pagination for responses that never page
    pub fn none() -> Self {
        Self {
            has_next_page: false,
            cursor: None,
        }
    }
}

/// Envelope for collection listings
#[derive(Debug, Serialize)]
pub struct CollectionsEnvelope {
    pub collections: Vec<Collection>,
    pub pagination: Pagination,
}

/// Envelope for token listings
#[derive(Debug, Serialize)]
pub struct TokensEnvelope {
    pub tokens: Vec<Token>,
    pub pagination: Pagination,
}

/// Envelope for the fixed-contract route: tokens plus collection metadata
#[derive(Debug, Serialize)]
pub struct ContractCollectionEnvelope {
    pub collection: Option<Collection>,
    pub tokens: Vec<Token>,
    pub pagination: Pagination,
}
