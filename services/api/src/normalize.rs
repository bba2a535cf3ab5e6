//! Mapping of heterogeneous provider payloads into canonical records
//!
//! Rules, applied uniformly across providers:
//! - missing or empty image fields become a placeholder URL deterministic
//!   in the item's position within the response;
//! - `ipfs://` image URIs are rewritten to a public HTTP gateway;
//! - price fields are carried as `f64`, absent values stay `None`;
//! - attributes are accepted in both the `trait_type`/`value` and the
//!   `key`/`value` shape;
//! - malformed raw metadata yields an empty attribute set and a warning,
//!   never an error.

use serde_json::Value;
use tracing::warn;

use crate::models::market::{Collection, Token, TokenAttribute};
use crate::providers::moralis::MoralisNft;
use crate::providers::reservoir::{PriceQuote, ReservoirCollection, TokenEntry};

pub const IPFS_GATEWAY: &str = "https://ipfs.io/ipfs/";
const PLACEHOLDER_BASE: &str = "https://picsum.photos/seed";

/// Rewrite `ipfs://` URIs to the public HTTP gateway
pub fn gateway_image_url(raw: &str) -> String {
    match raw.strip_prefix("ipfs://") {
        Some(rest) => {
            // Some emitters write ipfs://ipfs/<cid>; collapse the duplicate.
            let rest = rest.strip_prefix("ipfs/").unwrap_or(rest);
            format!("{}{}", IPFS_GATEWAY, rest)
        }
        None => raw.to_string(),
    }
}

/// Placeholder image URL, deterministic in the item's index
pub fn placeholder_image(index: usize) -> String {
    format!("{}/nft-{}/400/400", PLACEHOLDER_BASE, index)
}

/// Usable image URL for an item: gatewayed when present, placeholder otherwise
pub fn image_or_placeholder(image: Option<&str>, index: usize) -> String {
    match image {
        Some(raw) if !raw.trim().is_empty() => gateway_image_url(raw),
        _ => placeholder_image(index),
    }
}

/// Map a Reservoir collection into the canonical record
pub fn normalize_collection(raw: &ReservoirCollection, index: usize) -> Collection {
    Collection {
        id: raw
            .id
            .clone()
            .unwrap_or_else(|| format!("collection-{}", index)),
        name: raw
            .name
            .clone()
            .unwrap_or_else(|| "Unnamed collection".to_string()),
        slug: raw.slug.clone(),
        image: image_or_placeholder(raw.image.as_deref(), index),
        floor_price: raw.floor_price(),
        one_day_volume: raw.volume.as_ref().and_then(|v| v.one_day),
        token_count: raw.token_count.as_ref().and_then(|s| s.parse().ok()),
        owner_count: raw.owner_count,
        contract_address: raw.primary_contract.clone(),
    }
}

/// Map a Reservoir token entry into the canonical record.
/// Returns `None` for entries with no token payload at all.
pub fn normalize_token(entry: &TokenEntry, index: usize) -> Option<Token> {
    let token = entry.token.as_ref()?;

    let id = match (&token.contract, &token.token_id) {
        (Some(contract), Some(token_id)) => format!("{}:{}", contract, token_id),
        _ => token
            .token_id
            .clone()
            .unwrap_or_else(|| format!("token-{}", index)),
    };
    let name = token
        .name
        .clone()
        .or_else(|| token.token_id.as_ref().map(|id| format!("#{}", id)))
        .unwrap_or_else(|| format!("Token #{}", index));

    let attributes = token
        .attributes
        .iter()
        .flatten()
        .map(|attribute| TokenAttribute {
            trait_type: attribute.key.clone().unwrap_or_default(),
            value: attribute.value.as_ref().map(value_to_string).unwrap_or_default(),
            rarity: None,
        })
        .collect();

    Some(Token {
        id,
        name,
        image: image_or_placeholder(token.image.as_deref(), index),
        floor_price: entry
            .market
            .as_ref()
            .and_then(|m| m.floor_ask.as_ref())
            .and_then(PriceQuote::native),
        last_sale_price: token.last_sale.as_ref().and_then(PriceQuote::native),
        attributes,
        owner: token.owner.clone(),
        contract_address: token.contract.clone(),
        rarity_score: token.rarity,
        rank: token.rarity_rank,
    })
}

/// Map a Moralis contract NFT into the canonical record
pub fn normalize_contract_nft(raw: &MoralisNft, index: usize) -> Token {
    let fallback = raw
        .metadata
        .as_deref()
        .map(parse_raw_metadata)
        .unwrap_or_default();
    let normalized = raw.normalized_metadata.as_ref();

    let id = match (&raw.token_address, &raw.token_id) {
        (Some(contract), Some(token_id)) => format!("{}:{}", contract, token_id),
        _ => raw
            .token_id
            .clone()
            .unwrap_or_else(|| format!("token-{}", index)),
    };
    let name = normalized
        .and_then(|m| m.name.clone())
        .or(fallback.name)
        .or_else(|| raw.token_id.as_ref().map(|id| format!("#{}", id)))
        .unwrap_or_else(|| format!("Token #{}", index));
    let image = normalized.and_then(|m| m.image.clone()).or(fallback.image);

    let attributes = match normalized.and_then(|m| m.attributes.as_ref()) {
        Some(attributes) => attributes
            .iter()
            .filter_map(|attribute| {
                Some(TokenAttribute {
                    trait_type: attribute.trait_type.clone()?,
                    value: attribute.value.as_ref().map(value_to_string).unwrap_or_default(),
                    rarity: attribute.percentage,
                })
            })
            .collect(),
        None => fallback.attributes,
    };

    Token {
        id,
        name,
        image: image_or_placeholder(image.as_deref(), index),
        floor_price: None,
        last_sale_price: None,
        attributes,
        owner: raw.owner_of.clone(),
        contract_address: raw.token_address.clone(),
        rarity_score: None,
        rank: None,
    }
}

/// Attributes extracted from an untyped metadata value.
/// Accepts both `trait_type` and `key` as the trait name field.
pub fn attributes_from_value(value: &Value) -> Vec<TokenAttribute> {
    value
        .as_array()
        .map(|items| items.iter().filter_map(attribute_from_value).collect())
        .unwrap_or_default()
}

fn attribute_from_value(value: &Value) -> Option<TokenAttribute> {
    let object = value.as_object()?;
    let trait_type = object
        .get("trait_type")
        .or_else(|| object.get("key"))?
        .as_str()?
        .to_string();
    let value = object.get("value").map(value_to_string).unwrap_or_default();
    let rarity = object
        .get("rarity")
        .or_else(|| object.get("percentage"))
        .and_then(Value::as_f64);

    Some(TokenAttribute {
        trait_type,
        value,
        rarity,
    })
}

fn value_to_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[derive(Debug, Default)]
struct ParsedMetadata {
    name: Option<String>,
    image: Option<String>,
    attributes: Vec<TokenAttribute>,
}

/// Parse a raw metadata JSON string; malformed input is discarded
fn parse_raw_metadata(raw: &str) -> ParsedMetadata {
    match serde_json::from_str::<Value>(raw) {
        Ok(metadata) => ParsedMetadata {
            name: metadata
                .get("name")
                .and_then(Value::as_str)
                .map(str::to_string),
            image: metadata
                .get("image")
                .and_then(Value::as_str)
                .map(str::to_string),
            attributes: metadata
                .get("attributes")
                .map(attributes_from_value)
                .unwrap_or_default(),
        },
        Err(e) => {
            warn!("Discarding malformed token metadata: {}", e);
            ParsedMetadata::default()
        }
    }
}
