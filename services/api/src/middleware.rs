//! Server-side authorization for admin routes
//!
//! The frontend's identity provider supplies the caller's UID; mutating
//! admin routes only proceed when the matching user row carries the
//! `admin_role` flag. The check happens here, never in the client.

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use tracing::warn;

use crate::{error::ApiError, state::AppState};

/// Header carrying the caller's auth-provider UID
pub const USER_UID_HEADER: &str = "x-user-uid";

/// Identity of an authorized admin caller, attached to request extensions
#[derive(Debug, Clone)]
pub struct AdminUser {
    pub id: i64,
    pub uid: String,
}

/// Reject requests whose caller is missing, unknown, or not an admin
pub async fn require_admin(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let uid = request
        .headers()
        .get(USER_UID_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(str::to_owned)
        .ok_or(ApiError::Unauthorized)?;

    let user = state
        .user_repository
        .find_by_uid(&uid)
        .await?
        .ok_or(ApiError::Unauthorized)?;

    if !user.admin_role {
        warn!("Rejecting non-admin caller {} on admin route", uid);
        return Err(ApiError::Forbidden);
    }

    request.extensions_mut().insert(AdminUser {
        id: user.id,
        uid: user.uid,
    });

    Ok(next.run(request).await)
}
