//! PostgreSQL-backed cart store.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use common::{CartId, UserId};
use sqlx::{PgPool, Row, postgres::PgRow};
use uuid::Uuid;

use crate::{Cart, CartItem, CartStore, Result, StoreError, Version};

/// PostgreSQL cart store implementation.
///
/// One row per user in the `carts` table; the line items live in a
/// single JSONB column. The `version` column backs the compare-and-swap
/// in `replace`.
#[derive(Clone)]
pub struct PostgresCartStore {
    pool: PgPool,
}

impl PostgresCartStore {
    /// Creates a new PostgreSQL cart store.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Gets a reference to the underlying connection pool.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Runs the database migrations.
    pub async fn run_migrations(&self) -> std::result::Result<(), sqlx::migrate::MigrateError> {
        sqlx::migrate!("../../migrations").run(&self.pool).await
    }

    fn row_to_cart(row: PgRow) -> Result<Cart> {
        let items_json: serde_json::Value = row.try_get("items")?;
        let items: Vec<CartItem> = serde_json::from_value(items_json)?;

        Ok(Cart {
            id: CartId::from_uuid(row.try_get::<Uuid, _>("id")?),
            user_id: UserId::new(row.try_get::<String, _>("user_id")?),
            items,
            version: Version::new(row.try_get("version")?),
            created_at: row.try_get::<DateTime<Utc>, _>("created_at")?,
            updated_at: row.try_get::<DateTime<Utc>, _>("updated_at")?,
        })
    }
}

#[async_trait]
impl CartStore for PostgresCartStore {
    async fn find_by_user(&self, user_id: &UserId) -> Result<Option<Cart>> {
        let row = sqlx::query(
            "SELECT id, user_id, items, version, created_at, updated_at \
             FROM carts WHERE user_id = $1",
        )
        .bind(user_id.as_str())
        .fetch_optional(&self.pool)
        .await?;

        row.map(Self::row_to_cart).transpose()
    }

    async fn create(&self, cart: Cart) -> Result<Cart> {
        let items_json = serde_json::to_value(&cart.items)?;

        let row = sqlx::query(
            r#"
            INSERT INTO carts (id, user_id, items, version, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, user_id, items, version, created_at, updated_at
            "#,
        )
        .bind(cart.id.as_uuid())
        .bind(cart.user_id.as_str())
        .bind(items_json)
        .bind(Version::initial().as_i64())
        .bind(cart.created_at)
        .bind(cart.updated_at)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(ref db_err) = e {
                if db_err.constraint() == Some("carts_user_id_key") {
                    return StoreError::AlreadyExists(cart.user_id.clone());
                }
            }
            StoreError::Database(e)
        })?;

        Self::row_to_cart(row)
    }

    async fn replace(&self, cart: Cart) -> Result<Cart> {
        let items_json = serde_json::to_value(&cart.items)?;

        let row = sqlx::query(
            r#"
            UPDATE carts
            SET items = $3, version = version + 1, updated_at = $4
            WHERE user_id = $1 AND version = $2
            RETURNING id, user_id, items, version, created_at, updated_at
            "#,
        )
        .bind(cart.user_id.as_str())
        .bind(cart.version.as_i64())
        .bind(items_json)
        .bind(cart.updated_at)
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(row) => Self::row_to_cart(row),
            None => {
                // Either the row is gone or another writer bumped the
                // version; report which so the caller can retry.
                let actual: Option<i64> =
                    sqlx::query_scalar("SELECT version FROM carts WHERE user_id = $1")
                        .bind(cart.user_id.as_str())
                        .fetch_optional(&self.pool)
                        .await?;

                match actual {
                    Some(actual) => {
                        tracing::debug!(
                            user_id = %cart.user_id,
                            expected = %cart.version,
                            actual,
                            "cart replace lost the version race"
                        );
                        Err(StoreError::ConcurrencyConflict {
                            user_id: cart.user_id,
                            expected: cart.version,
                            actual: Version::new(actual),
                        })
                    }
                    None => Err(StoreError::NotFound(cart.user_id)),
                }
            }
        }
    }

    async fn delete(&self, user_id: &UserId) -> Result<()> {
        sqlx::query("DELETE FROM carts WHERE user_id = $1")
            .bind(user_id.as_str())
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}
