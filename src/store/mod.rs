//! Key-value persistence port.
//!
//! Every collection lives as one JSON value under a single key. Callers read
//! the whole value, transform it, and overwrite the key; there is no partial
//! update.
// region:    --- Imports
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;

mod memory;
mod postgres;

pub use memory::MemoryStore;
pub use postgres::PostgresStore;

// endregion: --- Imports

// region:    --- Keys
pub const GOLD_AUCTIONS: &str = "gold_auctions";
pub const VENDOR_BILLING_SETTINGS: &str = "jf_vendor_billing_settings";
// endregion: --- Keys

// region:    --- Errors
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Stored value under `{key}` is malformed: {source}")]
    Serialization {
        key: String,
        #[source]
        source: serde_json::Error,
    },
}
// endregion: --- Errors

// region:    --- KvStore Trait
/// Whole-value get/set by key
#[async_trait]
pub trait KvStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<serde_json::Value>, StoreError>;
    async fn set(&self, key: &str, value: serde_json::Value) -> Result<(), StoreError>;
}

/// Reads `key` as `T`, falling back to `T::default()` when the key is absent.
pub async fn load<T>(store: &dyn KvStore, key: &str) -> Result<T, StoreError>
where
    T: DeserializeOwned + Default,
{
    match store.get(key).await? {
        Some(value) => serde_json::from_value(value).map_err(|source| StoreError::Serialization {
            key: key.to_string(),
            source,
        }),
        None => Ok(T::default()),
    }
}

/// Serializes `value` and overwrites `key`.
pub async fn save<T>(store: &dyn KvStore, key: &str, value: &T) -> Result<(), StoreError>
where
    T: Serialize + ?Sized,
{
    let value = serde_json::to_value(value).map_err(|source| StoreError::Serialization {
        key: key.to_string(),
        source,
    })?;
    store.set(key, value).await
}
// endregion: --- KvStore Trait
