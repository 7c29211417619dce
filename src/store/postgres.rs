// region:    --- Imports
use super::{KvStore, StoreError};
use async_trait::async_trait;
use sqlx::postgres::{PgPool, PgPoolOptions};
use sqlx::Row;
use std::sync::Arc;
use tracing::info;

// endregion: --- Imports

// region:    --- Postgres Store
/// Postgres-backed store: one JSONB row per key
pub struct PostgresStore {
    pool: Arc<PgPool>,
}

impl PostgresStore {
    /// Opens the connection pool
    pub async fn connect(database_url: &str) -> Result<Self, StoreError> {
        let pool = PgPoolOptions::new()
            .max_connections(5)
            .connect(database_url)
            .await?;
        Ok(Self {
            pool: Arc::new(pool),
        })
    }

    /// Creates the `kv_store` table when missing
    pub async fn initialize_schema(&self) -> Result<(), StoreError> {
        let create_schema_sql = include_str!("../sql/01-create-schema.sql");
        for query in create_schema_sql.split(';') {
            let query = query.trim();
            if !query.is_empty() {
                sqlx::query(query).execute(&*self.pool).await?;
            }
        }
        info!("{:<12} --> kv_store schema ready", "Store");
        Ok(())
    }
}

#[async_trait]
impl KvStore for PostgresStore {
    async fn get(&self, key: &str) -> Result<Option<serde_json::Value>, StoreError> {
        let row = sqlx::query("SELECT value FROM kv_store WHERE key = $1")
            .bind(key)
            .fetch_optional(&*self.pool)
            .await?;
        Ok(row
            .map(|row| row.try_get::<serde_json::Value, _>("value"))
            .transpose()?)
    }

    async fn set(&self, key: &str, value: serde_json::Value) -> Result<(), StoreError> {
        sqlx::query(
            "INSERT INTO kv_store (key, value, updated_at)
             VALUES ($1, $2, NOW())
             ON CONFLICT (key) DO UPDATE SET value = EXCLUDED.value, updated_at = NOW()",
        )
        .bind(key)
        .bind(&value)
        .execute(&*self.pool)
        .await?;
        Ok(())
    }
}
// endregion: --- Postgres Store
