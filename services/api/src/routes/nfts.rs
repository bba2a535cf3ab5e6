//! Routes for user-uploaded NFT records

use axum::{
    Json,
    extract::{Multipart, Query, State},
    http::StatusCode,
};
use serde::Deserialize;
use tracing::info;

use crate::error::ApiError;
use crate::models::nft::{NewNftRecord, NftResponse};
use crate::state::AppState;
use crate::uploads::store_upload;

/// Query parameters of the NFT listing
#[derive(Debug, Deserialize)]
pub struct NftListQuery {
    /// Owner UID to filter by
    pub owner: Option<String>,
}

/// `POST /nfts` — multipart NFT upload. Expects `uid`, `title`, the `image`
/// file, and optional `description`, `price`, `category` fields.
///
/// The image write and the row insert are not wrapped in a transaction; a
/// crash in between leaves an orphaned file, which the admin delete path
/// also tolerates.
pub async fn create_nft(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<NftResponse>), ApiError> {
    let mut uid: Option<String> = None;
    let mut title: Option<String> = None;
    let mut description: Option<String> = None;
    let mut price: Option<f64> = None;
    let mut category: Option<String> = None;
    let mut stored_file: Option<String> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::BadRequest(format!("invalid multipart payload: {}", e)))?
    {
        let name = field.name().map(str::to_owned);
        match name.as_deref() {
            Some("image") => {
                stored_file = Some(store_upload(&state.config.upload_dir, field).await?);
            }
            Some(other) => {
                let value = field.text().await.map_err(|e| {
                    ApiError::BadRequest(format!("invalid {} field: {}", other, e))
                })?;
                match other {
                    "uid" => uid = Some(value),
                    "title" => title = Some(value),
                    "description" => description = Some(value),
                    "category" => category = Some(value),
                    "price" => {
                        price = Some(value.parse().map_err(|_| {
                            ApiError::BadRequest(format!("invalid price: {}", value))
                        })?);
                    }
                    _ => {}
                }
            }
            None => {}
        }
    }

    let uid = uid
        .filter(|value| !value.trim().is_empty())
        .ok_or_else(|| ApiError::BadRequest("uid is required".to_string()))?;
    let title = title
        .filter(|value| !value.trim().is_empty())
        .ok_or_else(|| ApiError::BadRequest("title is required".to_string()))?;
    let image_path = stored_file
        .ok_or_else(|| ApiError::BadRequest("image file is required".to_string()))?;

    let owner = state
        .user_repository
        .find_by_uid(&uid)
        .await?
        .ok_or(ApiError::NotFound("user"))?;
    if !owner.can_upload {
        return Err(ApiError::Forbidden);
    }

    info!("Creating NFT '{}' for uid {}", title, uid);

    let record = state
        .nft_repository
        .insert(&NewNftRecord {
            title,
            description,
            price,
            image_path,
            category,
            owner_id: owner.id,
        })
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(NftResponse::from_record(
            record,
            owner.uid,
            owner.username,
            &state.config.public_base_url,
        )),
    ))
}

/// `GET /nfts?owner=` — NFT rows joined to their owners
pub async fn list_nfts(
    State(state): State<AppState>,
    Query(query): Query<NftListQuery>,
) -> Result<Json<Vec<NftResponse>>, ApiError> {
    let records = state
        .nft_repository
        .list_with_owner(query.owner.as_deref())
        .await?;

    let nfts = records
        .into_iter()
        .map(|record| NftResponse::from_joined(record, &state.config.public_base_url))
        .collect();

    Ok(Json(nfts))
}
