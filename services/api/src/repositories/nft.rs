//! NFT repository for database operations

use sqlx::PgPool;
use tracing::info;

use common::error::{DatabaseError, DatabaseResult};

use crate::models::nft::{NewNftRecord, NftRecord, NftStatus, NftWithOwner, UpdateNftRequest};

const NFT_COLUMNS: &str =
    "id, title, description, price, image_path, category, status, owner_id, created_at";

/// NFT repository
#[derive(Clone)]
pub struct NftRepository {
    pool: PgPool,
}

impl NftRepository {
    /// Create a new NFT repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Insert one NFT row
    pub async fn insert(&self, record: &NewNftRecord) -> DatabaseResult<NftRecord> {
        info!("Inserting NFT '{}' for owner {}", record.title, record.owner_id);

        let query = format!(
            r#"
            INSERT INTO nfts (title, description, price, image_path, category, owner_id)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {}
            "#,
            NFT_COLUMNS
        );

        sqlx::query_as::<_, NftRecord>(&query)
            .bind(&record.title)
            .bind(&record.description)
            .bind(record.price)
            .bind(&record.image_path)
            .bind(&record.category)
            .bind(record.owner_id)
            .fetch_one(&self.pool)
            .await
            .map_err(DatabaseError::Query)
    }

    /// List NFTs joined to their owning user, optionally filtered by owner UID
    pub async fn list_with_owner(&self, owner_uid: Option<&str>) -> DatabaseResult<Vec<NftWithOwner>> {
        sqlx::query_as::<_, NftWithOwner>(
            r#"
            SELECT n.id, n.title, n.description, n.price, n.image_path, n.category,
                   n.status, n.owner_id, n.created_at,
                   u.uid AS owner_uid, u.username AS owner_username
            FROM nfts n
            JOIN users u ON u.id = n.owner_id
            WHERE $1::text IS NULL OR u.uid = $1
            ORDER BY n.created_at DESC
            "#,
        )
        .bind(owner_uid)
        .fetch_all(&self.pool)
        .await
        .map_err(DatabaseError::Query)
    }

    /// Edit NFT fields; absent fields keep their value. Returns `None` for
    /// an unknown id.
    pub async fn update(
        &self,
        id: i64,
        payload: &UpdateNftRequest,
    ) -> DatabaseResult<Option<NftRecord>> {
        let query = format!(
            r#"
            UPDATE nfts SET
                title = COALESCE($2, title),
                description = COALESCE($3, description),
                price = COALESCE($4, price),
                category = COALESCE($5, category)
            WHERE id = $1
            RETURNING {}
            "#,
            NFT_COLUMNS
        );

        sqlx::query_as::<_, NftRecord>(&query)
            .bind(id)
            .bind(&payload.title)
            .bind(&payload.description)
            .bind(payload.price)
            .bind(&payload.category)
            .fetch_optional(&self.pool)
            .await
            .map_err(DatabaseError::Query)
    }

    /// Set the listing status. Last writer wins; repeating a status is a
    /// no-op. Returns `None` for an unknown id.
    pub async fn set_status(
        &self,
        id: i64,
        status: NftStatus,
    ) -> DatabaseResult<Option<NftRecord>> {
        let query = format!(
            "UPDATE nfts SET status = $2 WHERE id = $1 RETURNING {}",
            NFT_COLUMNS
        );

        sqlx::query_as::<_, NftRecord>(&query)
            .bind(id)
            .bind(status.as_str())
            .fetch_optional(&self.pool)
            .await
            .map_err(DatabaseError::Query)
    }

    /// Delete one NFT row, returning it so the caller can clean up the
    /// stored image file. Returns `None` for an unknown id.
    pub async fn delete(&self, id: i64) -> DatabaseResult<Option<NftRecord>> {
        let query = format!("DELETE FROM nfts WHERE id = $1 RETURNING {}", NFT_COLUMNS);

        sqlx::query_as::<_, NftRecord>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(DatabaseError::Query)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::user::CreateUserRequest;
    use crate::repositories::UserRepository;
    use common::database::{DatabaseConfig, init_pool};
    use serial_test::serial;
    use uuid::Uuid;

    async fn test_pool() -> PgPool {
        let config = DatabaseConfig::from_env().expect("database config");
        let pool = init_pool(&config).await.expect("database pool");
        crate::MIGRATOR.run(&pool).await.expect("migrations");
        pool
    }

    async fn seeded_owner(pool: &PgPool) -> i64 {
        let users = UserRepository::new(pool.clone());
        users
            .create(&CreateUserRequest {
                uid: format!("test-{}", Uuid::new_v4()),
                email: None,
                username: Some("seller".to_string()),
                display_name: None,
            })
            .await
            .unwrap()
            .unwrap()
            .id
    }

    #[tokio::test]
    #[serial]
    #[ignore = "requires a running PostgreSQL instance"]
    async fn status_toggle_reflects_last_write() {
        let pool = test_pool().await;
        let owner_id = seeded_owner(&pool).await;
        let repository = NftRepository::new(pool);

        let record = repository
            .insert(&NewNftRecord {
                title: "Sunset".to_string(),
                description: None,
                price: Some(0.5),
                image_path: "sunset.png".to_string(),
                category: Some("Art".to_string()),
                owner_id,
            })
            .await
            .unwrap();
        assert_eq!(record.status, "Listed");

        let sold = repository
            .set_status(record.id, NftStatus::Sold)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(sold.status, "Sold");

        // Toggling back and repeating the same status is idempotent.
        for status in [NftStatus::Listed, NftStatus::Listed] {
            let updated = repository
                .set_status(record.id, status)
                .await
                .unwrap()
                .unwrap();
            assert_eq!(updated.status, "Listed");
        }
    }
}
