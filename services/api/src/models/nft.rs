//! NFT record models and payloads

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::uploads::absolute_url;

/// Listing status of a stored NFT
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NftStatus {
    Listed,
    Sold,
}

impl NftStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            NftStatus::Listed => "Listed",
            NftStatus::Sold => "Sold",
        }
    }
}

/// One row of the `nfts` table
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct NftRecord {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    pub price: Option<f64>,
    pub image_path: String,
    pub category: Option<String>,
    pub status: String,
    pub owner_id: i64,
    pub created_at: DateTime<Utc>,
}

/// An NFT row joined to its owning user
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct NftWithOwner {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    pub price: Option<f64>,
    pub image_path: String,
    pub category: Option<String>,
    pub status: String,
    pub owner_id: i64,
    pub created_at: DateTime<Utc>,
    pub owner_uid: String,
    pub owner_username: Option<String>,
}

/// Values for a new `nfts` row
#[derive(Debug, Clone)]
pub struct NewNftRecord {
    pub title: String,
    pub description: Option<String>,
    pub price: Option<f64>,
    pub image_path: String,
    pub category: Option<String>,
    pub owner_id: i64,
}

/// NFT fields accepted by the admin edit endpoint; absent fields are kept
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateNftRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub price: Option<f64>,
    pub category: Option<String>,
}

/// Request body for the status toggle endpoint
#[derive(Debug, Clone, Deserialize)]
pub struct SetNftStatusRequest {
    pub status: NftStatus,
}

/// NFT representation returned to clients, with an absolutized image URL
#[derive(Debug, Clone, Serialize)]
pub struct NftResponse {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    pub price: Option<f64>,
    pub image_url: String,
    pub category: Option<String>,
    pub status: String,
    pub owner_uid: String,
    pub owner_username: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl NftResponse {
    pub fn from_joined(record: NftWithOwner, base: &str) -> Self {
        Self {
            id: record.id,
            title: record.title,
            description: record.description,
            price: record.price,
            image_url: absolute_url(base, &record.image_path),
            category: record.category,
            status: record.status,
            owner_uid: record.owner_uid,
            owner_username: record.owner_username,
            created_at: record.created_at,
        }
    }

    pub fn from_record(record: NftRecord, owner_uid: String, owner_username: Option<String>, base: &str) -> Self {
        Self {
            id: record.id,
            title: record.title,
            description: record.description,
            price: record.price,
            image_url: absolute_url(base, &record.image_path),
            category: record.category,
            status: record.status,
            owner_uid,
            owner_username,
            created_at: record.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_serializes_as_display_strings() {
        assert_eq!(
            serde_json::to_value(NftStatus::Listed).unwrap(),
            serde_json::json!("Listed")
        );
        let parsed: SetNftStatusRequest =
            serde_json::from_str(r#"{"status": "Sold"}"#).unwrap();
        assert_eq!(parsed.status, NftStatus::Sold);
        assert_eq!(parsed.status.as_str(), "Sold");
    }

    #[test]
    fn unknown_status_is_rejected() {
        let parsed = serde_json::from_str::<SetNftStatusRequest>(r#"{"status": "Burned"}"#);
        assert!(parsed.is_err());
    }
}
