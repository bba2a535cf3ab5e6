//! Profile CRUD routes
//!
//! Users are keyed by the UID the hosted identity provider assigns at
//! sign-in; this service never handles credentials itself.

use axum::{
    Json,
    extract::{Multipart, Path, State},
    http::StatusCode,
};
use tracing::info;

use crate::error::ApiError;
use crate::models::user::{CreateUserRequest, ProfileImageKind, UpdateProfileRequest, User};
use crate::state::AppState;
use crate::uploads::store_upload;

/// `POST /users` — create the row backing a fresh sign-up. Calling it again
/// with the same UID returns the existing row unchanged.
pub async fn create_user(
    State(state): State<AppState>,
    Json(payload): Json<CreateUserRequest>,
) -> Result<(StatusCode, Json<User>), ApiError> {
    if payload.uid.trim().is_empty() {
        return Err(ApiError::BadRequest("uid is required".to_string()));
    }

    if let Some(user) = state.user_repository.create(&payload).await? {
        return Ok((
            StatusCode::CREATED,
            Json(user.with_absolute_image_urls(&state.config.public_base_url)),
        ));
    }

    // Conflict: the uid was already registered.
    let existing = state
        .user_repository
        .find_by_uid(&payload.uid)
        .await?
        .ok_or(ApiError::InternalServerError)?;

    Ok((
        StatusCode::OK,
        Json(existing.with_absolute_image_urls(&state.config.public_base_url)),
    ))
}

/// `GET /users/:uid`
pub async fn get_user(
    State(state): State<AppState>,
    Path(uid): Path<String>,
) -> Result<Json<User>, ApiError> {
    let user = state
        .user_repository
        .find_by_uid(&uid)
        .await?
        .ok_or(ApiError::NotFound("user"))?;

    Ok(Json(
        user.with_absolute_image_urls(&state.config.public_base_url),
    ))
}

/// `PUT /users/:uid` — upsert profile fields
pub async fn update_user(
    State(state): State<AppState>,
    Path(uid): Path<String>,
    Json(payload): Json<UpdateProfileRequest>,
) -> Result<Json<User>, ApiError> {
    if uid.trim().is_empty() {
        return Err(ApiError::BadRequest("uid is required".to_string()));
    }

    let user = state.user_repository.upsert_profile(&uid, &payload).await?;

    Ok(Json(
        user.with_absolute_image_urls(&state.config.public_base_url),
    ))
}

/// `POST /users/upload-image` — multipart avatar/cover upload.
/// Expects fields `uid`, `kind` (avatar | cover) and the `image` file.
pub async fn upload_profile_image(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<User>, ApiError> {
    let mut uid: Option<String> = None;
    let mut kind: Option<ProfileImageKind> = None;
    let mut stored_file: Option<String> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::BadRequest(format!("invalid multipart payload: {}", e)))?
    {
        match field.name() {
            Some("uid") => {
                uid = Some(field.text().await.map_err(|e| {
                    ApiError::BadRequest(format!("invalid uid field: {}", e))
                })?);
            }
            Some("kind") => {
                let raw = field.text().await.map_err(|e| {
                    ApiError::BadRequest(format!("invalid kind field: {}", e))
                })?;
                kind = Some(raw.parse().map_err(ApiError::BadRequest)?);
            }
            Some("image") => {
                stored_file = Some(store_upload(&state.config.upload_dir, field).await?);
            }
            _ => {}
        }
    }

    let uid = uid
        .filter(|value| !value.trim().is_empty())
        .ok_or_else(|| ApiError::BadRequest("uid is required".to_string()))?;
    let kind = kind.unwrap_or(ProfileImageKind::Avatar);
    let file_name = stored_file
        .ok_or_else(|| ApiError::BadRequest("image file is required".to_string()))?;

    info!("Storing {:?} image for uid {}", kind, uid);

    let user = state
        .user_repository
        .set_image(&uid, kind, &file_name)
        .await?
        .ok_or(ApiError::NotFound("user"))?;

    Ok(Json(
        user.with_absolute_image_urls(&state.config.public_base_url),
    ))
}
