//! Admin mutation routes
//!
//! Every route here runs behind the `require_admin` middleware; the
//! `admin_role` check happens against the database on each request.
//! Mutations are independent single-row statements with last-writer-wins
//! semantics.

use axum::{
    Extension, Json,
    extract::{Path, State},
};
use tracing::info;

use crate::error::ApiError;
use crate::middleware::AdminUser;
use crate::models::nft::{NftRecord, SetNftStatusRequest, UpdateNftRequest};
use crate::models::user::{UpdateProfileRequest, UpdateUserFlagsRequest, User};
use crate::routes::message;
use crate::state::AppState;
use crate::uploads::remove_upload;

/// `GET /admin/users`
pub async fn list_users(State(state): State<AppState>) -> Result<Json<Vec<User>>, ApiError> {
    let users = state
        .user_repository
        .list_all()
        .await?
        .into_iter()
        .map(|user| user.with_absolute_image_urls(&state.config.public_base_url))
        .collect();

    Ok(Json(users))
}

/// `PUT /admin/users/:uid` — edit arbitrary profile fields
pub async fn update_user(
    State(state): State<AppState>,
    Extension(admin): Extension<AdminUser>,
    Path(uid): Path<String>,
    Json(payload): Json<UpdateProfileRequest>,
) -> Result<Json<User>, ApiError> {
    info!("Admin {} editing profile of {}", admin.uid, uid);

    let user = state.user_repository.upsert_profile(&uid, &payload).await?;

    Ok(Json(
        user.with_absolute_image_urls(&state.config.public_base_url),
    ))
}

/// `PUT /admin/users/:uid/flags` — toggle `can_upload` / `admin_role`
pub async fn set_user_flags(
    State(state): State<AppState>,
    Extension(admin): Extension<AdminUser>,
    Path(uid): Path<String>,
    Json(payload): Json<UpdateUserFlagsRequest>,
) -> Result<Json<User>, ApiError> {
    info!(
        "Admin {} setting flags for {}: can_upload={:?} admin_role={:?}",
        admin.uid, uid, payload.can_upload, payload.admin_role
    );

    let user = state
        .user_repository
        .set_flags(&uid, &payload)
        .await?
        .ok_or(ApiError::NotFound("user"))?;

    Ok(Json(
        user.with_absolute_image_urls(&state.config.public_base_url),
    ))
}

/// `PUT /admin/nfts/:id` — edit NFT row fields
pub async fn update_nft(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(payload): Json<UpdateNftRequest>,
) -> Result<Json<NftRecord>, ApiError> {
    let record = state
        .nft_repository
        .update(id, &payload)
        .await?
        .ok_or(ApiError::NotFound("NFT"))?;

    Ok(Json(record))
}

/// `PUT /admin/nfts/:id/status` — set `Listed` | `Sold`
pub async fn set_nft_status(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(payload): Json<SetNftStatusRequest>,
) -> Result<Json<NftRecord>, ApiError> {
    let record = state
        .nft_repository
        .set_status(id, payload.status)
        .await?
        .ok_or(ApiError::NotFound("NFT"))?;

    Ok(Json(record))
}

/// `DELETE /admin/nfts/:id` — delete the row, then the stored image
pub async fn delete_nft(
    State(state): State<AppState>,
    Extension(admin): Extension<AdminUser>,
    Path(id): Path<i64>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let record = state
        .nft_repository
        .delete(id)
        .await?
        .ok_or(ApiError::NotFound("NFT"))?;

    info!("Admin {} deleted NFT {} ('{}')", admin.uid, id, record.title);
    remove_upload(&state.config.upload_dir, &record.image_path).await;

    Ok(message("NFT deleted"))
}
