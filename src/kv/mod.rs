//! Key-value store: the only persistence abstraction behind the API.
//!
//! DESIGN
//! ======
//! Every record is a JSON value stored under a string key. Uniqueness comes
//! entirely from how keys are built (see `keys`); there is no schema and no
//! foreign-key checking. Writes overwrite unconditionally. Prefix scans return
//! values ordered by key, which for millisecond-suffixed keys is creation
//! order.
//!
//! Only single-key operations are atomic. The `m*` batch helpers are a
//! convenience, and backends that cannot batch fall back to looping.

pub mod keys;
pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

pub use memory::MemoryKvStore;
pub use postgres::PgKvStore;

#[derive(Debug, thiserror::Error)]
pub enum KvError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("record {key} could not be encoded or decoded: {source}")]
    Codec {
        key: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("batch size mismatch: {keys} keys, {values} values")]
    BatchMismatch { keys: usize, values: usize },
}

#[async_trait]
pub trait KvStore: Send + Sync + 'static {
    async fn get(&self, key: &str) -> Result<Option<Value>, KvError>;

    async fn set(&self, key: &str, value: Value) -> Result<(), KvError>;

    async fn del(&self, key: &str) -> Result<(), KvError>;

    /// Values of every key starting with `prefix`, ordered by key.
    async fn get_by_prefix(&self, prefix: &str) -> Result<Vec<Value>, KvError>;

    /// Values for `keys`, skipping missing ones.
    async fn mget(&self, keys: &[String]) -> Result<Vec<Value>, KvError> {
        let mut out = Vec::with_capacity(keys.len());
        for key in keys {
            if let Some(value) = self.get(key).await? {
                out.push(value);
            }
        }
        Ok(out)
    }

    async fn mset(&self, entries: Vec<(String, Value)>) -> Result<(), KvError> {
        for (key, value) in entries {
            self.set(&key, value).await?;
        }
        Ok(())
    }

    async fn mdel(&self, keys: &[String]) -> Result<(), KvError> {
        for key in keys {
            self.del(key).await?;
        }
        Ok(())
    }
}

/// Typed access on top of the raw JSON store.
#[async_trait]
pub trait KvStoreExt: KvStore {
    async fn get_json<T: DeserializeOwned + Send>(&self, key: &str) -> Result<Option<T>, KvError> {
        self.get(key)
            .await?
            .map(|value| serde_json::from_value(value).map_err(|source| KvError::Codec { key: key.to_owned(), source }))
            .transpose()
    }

    async fn set_json<T: Serialize + Sync>(&self, key: &str, value: &T) -> Result<(), KvError> {
        let value = serde_json::to_value(value).map_err(|source| KvError::Codec { key: key.to_owned(), source })?;
        self.set(key, value).await
    }
}

impl<S: KvStore + ?Sized> KvStoreExt for S {}

#[cfg(test)]
#[path = "mod_test.rs"]
mod tests;
