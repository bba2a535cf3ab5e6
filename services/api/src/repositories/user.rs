//! User repository for database operations

use sqlx::PgPool;
use tracing::info;

use common::error::{DatabaseError, DatabaseResult};

use crate::models::user::{
    CreateUserRequest, ProfileImageKind, UpdateProfileRequest, UpdateUserFlagsRequest, User,
};

const USER_COLUMNS: &str = "id, uid, email, username, display_name, bio, location, website, \
     twitter, instagram, avatar, cover_image, nft_balance, can_upload, admin_role, \
     created_at, updated_at";

/// User repository
#[derive(Clone)]
pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    /// Create a new user repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Insert a user row keyed by the external auth UID. Idempotent:
    /// returns `None` when a row with this UID already exists.
    pub async fn create(&self, payload: &CreateUserRequest) -> DatabaseResult<Option<User>> {
        info!("Creating user for uid {}", payload.uid);

        let query = format!(
            r#"
            INSERT INTO users (uid, email, username, display_name)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (uid) DO NOTHING
            RETURNING {}
            "#,
            USER_COLUMNS
        );

        sqlx::query_as::<_, User>(&query)
            .bind(&payload.uid)
            .bind(&payload.email)
            .bind(&payload.username)
            .bind(&payload.display_name)
            .fetch_optional(&self.pool)
            .await
            .map_err(DatabaseError::Query)
    }

    /// Upsert profile fields for a UID; absent fields keep their value
    pub async fn upsert_profile(
        &self,
        uid: &str,
        payload: &UpdateProfileRequest,
    ) -> DatabaseResult<User> {
        let query = format!(
            r#"
            INSERT INTO users (uid, email, username, display_name, bio, location,
                               website, twitter, instagram, nft_balance)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, COALESCE($10, 0))
            ON CONFLICT (uid) DO UPDATE SET
                email = COALESCE(EXCLUDED.email, users.email),
                username = COALESCE(EXCLUDED.username, users.username),
                display_name = COALESCE(EXCLUDED.display_name, users.display_name),
                bio = COALESCE(EXCLUDED.bio, users.bio),
                location = COALESCE(EXCLUDED.location, users.location),
                website = COALESCE(EXCLUDED.website, users.website),
                twitter = COALESCE(EXCLUDED.twitter, users.twitter),
                instagram = COALESCE(EXCLUDED.instagram, users.instagram),
                nft_balance = COALESCE($10, users.nft_balance),
                updated_at = now()
            RETURNING {}
            "#,
            USER_COLUMNS
        );

        sqlx::query_as::<_, User>(&query)
            .bind(uid)
            .bind(&payload.email)
            .bind(&payload.username)
            .bind(&payload.display_name)
            .bind(&payload.bio)
            .bind(&payload.location)
            .bind(&payload.website)
            .bind(&payload.twitter)
            .bind(&payload.instagram)
            .bind(payload.nft_balance)
            .fetch_one(&self.pool)
            .await
            .map_err(DatabaseError::Query)
    }

    /// Find a user by auth UID
    pub async fn find_by_uid(&self, uid: &str) -> DatabaseResult<Option<User>> {
        let query = format!("SELECT {} FROM users WHERE uid = $1", USER_COLUMNS);

        sqlx::query_as::<_, User>(&query)
            .bind(uid)
            .fetch_optional(&self.pool)
            .await
            .map_err(DatabaseError::Query)
    }

    /// List all users, newest first
    pub async fn list_all(&self) -> DatabaseResult<Vec<User>> {
        let query = format!(
            "SELECT {} FROM users ORDER BY created_at DESC",
            USER_COLUMNS
        );

        sqlx::query_as::<_, User>(&query)
            .fetch_all(&self.pool)
            .await
            .map_err(DatabaseError::Query)
    }

    /// Toggle capability flags. Returns `None` when the UID is unknown.
    pub async fn set_flags(
        &self,
        uid: &str,
        payload: &UpdateUserFlagsRequest,
    ) -> DatabaseResult<Option<User>> {
        let query = format!(
            r#"
            UPDATE users SET
                can_upload = COALESCE($2, can_upload),
                admin_role = COALESCE($3, admin_role),
                updated_at = now()
            WHERE uid = $1
            RETURNING {}
            "#,
            USER_COLUMNS
        );

        sqlx::query_as::<_, User>(&query)
            .bind(uid)
            .bind(payload.can_upload)
            .bind(payload.admin_role)
            .fetch_optional(&self.pool)
            .await
            .map_err(DatabaseError::Query)
    }

    /// Store the file name of a freshly uploaded profile image
    pub async fn set_image(
        &self,
        uid: &str,
        kind: ProfileImageKind,
        file_name: &str,
    ) -> DatabaseResult<Option<User>> {
        let column = match kind {
            ProfileImageKind::Avatar => "avatar",
            ProfileImageKind::Cover => "cover_image",
        };
        let query = format!(
            "UPDATE users SET {} = $2, updated_at = now() WHERE uid = $1 RETURNING {}",
            column, USER_COLUMNS
        );

        sqlx::query_as::<_, User>(&query)
            .bind(uid)
            .bind(file_name)
            .fetch_optional(&self.pool)
            .await
            .map_err(DatabaseError::Query)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::database::{DatabaseConfig, init_pool};
    use serial_test::serial;
    use uuid::Uuid;

    async fn test_pool() -> PgPool {
        let config = DatabaseConfig::from_env().expect("database config");
        let pool = init_pool(&config).await.expect("database pool");
        crate::MIGRATOR.run(&pool).await.expect("migrations");
        pool
    }

    #[tokio::test]
    #[serial]
    #[ignore = "requires a running PostgreSQL instance"]
    async fn create_is_idempotent_per_uid() {
        let repository = UserRepository::new(test_pool().await);
        let uid = format!("test-{}", Uuid::new_v4());
        let payload = CreateUserRequest {
            uid: uid.clone(),
            email: Some("bob@example.com".to_string()),
            username: Some("bob".to_string()),
            display_name: None,
        };

        let first = repository.create(&payload).await.unwrap();
        assert!(first.is_some());

        // Second insert with the same uid hits ON CONFLICT DO NOTHING.
        let second = repository.create(&payload).await.unwrap();
        assert!(second.is_none());

        let found = repository.find_by_uid(&uid).await.unwrap().unwrap();
        assert_eq!(found.uid, uid);
        assert_eq!(found.id, first.unwrap().id);
    }

    #[tokio::test]
    #[serial]
    #[ignore = "requires a running PostgreSQL instance"]
    async fn upsert_keeps_absent_fields() {
        let repository = UserRepository::new(test_pool().await);
        let uid = format!("test-{}", Uuid::new_v4());

        repository
            .upsert_profile(
                &uid,
                &UpdateProfileRequest {
                    username: Some("carol".to_string()),
                    bio: Some("collector".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        let updated = repository
            .upsert_profile(
                &uid,
                &UpdateProfileRequest {
                    location: Some("Berlin".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.username.as_deref(), Some("carol"));
        assert_eq!(updated.bio.as_deref(), Some("collector"));
        assert_eq!(updated.location.as_deref(), Some("Berlin"));
    }
}
