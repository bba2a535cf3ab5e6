//! User model and related payloads

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::str::FromStr;

use crate::uploads::absolute_url;

/// User entity, keyed by the external auth provider UID
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: i64,
    pub uid: String,
    pub email: Option<String>,
    pub username: Option<String>,
    pub display_name: Option<String>,
    pub bio: Option<String>,
    pub location: Option<String>,
    pub website: Option<String>,
    pub twitter: Option<String>,
    pub instagram: Option<String>,
    pub avatar: Option<String>,
    pub cover_image: Option<String>,
    pub nft_balance: f64,
    pub can_upload: bool,
    pub admin_role: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Rewrite relative avatar and cover paths to absolute URLs
    pub fn with_absolute_image_urls(mut self, base: &str) -> Self {
        self.avatar = self.avatar.map(|p| absolute_url(base, &p));
        self.cover_image = self.cover_image.map(|p| absolute_url(base, &p));
        self
    }
}

/// Request for user creation on first sign-in
#[derive(Debug, Clone, Deserialize)]
pub struct CreateUserRequest {
    pub uid: String,
    pub email: Option<String>,
    pub username: Option<String>,
    pub display_name: Option<String>,
}

/// Profile fields accepted by the upsert endpoint; absent fields are kept
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateProfileRequest {
    pub email: Option<String>,
    pub username: Option<String>,
    pub display_name: Option<String>,
    pub bio: Option<String>,
    pub location: Option<String>,
    pub website: Option<String>,
    pub twitter: Option<String>,
    pub instagram: Option<String>,
    pub nft_balance: Option<f64>,
}

/// Admin request toggling per-user capability flags
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateUserFlagsRequest {
    pub can_upload: Option<bool>,
    pub admin_role: Option<bool>,
}

/// Which profile image slot an upload targets
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProfileImageKind {
    Avatar,
    Cover,
}

impl FromStr for ProfileImageKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "avatar" => Ok(Self::Avatar),
            "cover" => Ok(Self::Cover),
            other => Err(format!("unknown image kind: {}", other)),
        }
    }
}
