//! Postgres-backed KV store.
//!
//! One table, `kv_store_66a01e1b(key TEXT PRIMARY KEY, value JSONB)`, created
//! by the migrations in `src/db/migrations`. Prefix scans compare the key's
//! leading characters instead of using `LIKE`, so `%` and `_` in caller
//! supplied ids need no escaping.

use std::collections::BTreeMap;

use async_trait::async_trait;
use serde_json::Value;
use sqlx::PgPool;
use sqlx::types::Json;

use super::{KvError, KvStore};

#[derive(Clone)]
pub struct PgKvStore {
    pool: PgPool,
}

impl PgKvStore {
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl KvStore for PgKvStore {
    async fn get(&self, key: &str) -> Result<Option<Value>, KvError> {
        let row = sqlx::query_scalar::<_, Json<Value>>("SELECT value FROM kv_store_66a01e1b WHERE key = $1")
            .bind(key)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(|Json(v)| v))
    }

    async fn set(&self, key: &str, value: Value) -> Result<(), KvError> {
        sqlx::query(
            "INSERT INTO kv_store_66a01e1b (key, value) VALUES ($1, $2)
             ON CONFLICT (key) DO UPDATE SET value = EXCLUDED.value",
        )
        .bind(key)
        .bind(Json(value))
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn del(&self, key: &str) -> Result<(), KvError> {
        sqlx::query("DELETE FROM kv_store_66a01e1b WHERE key = $1")
            .bind(key)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn get_by_prefix(&self, prefix: &str) -> Result<Vec<Value>, KvError> {
        let rows = sqlx::query_scalar::<_, Json<Value>>(
            "SELECT value FROM kv_store_66a01e1b
             WHERE left(key, char_length($1)) = $1
             ORDER BY key",
        )
        .bind(prefix)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(|Json(v)| v).collect())
    }

    async fn mget(&self, keys: &[String]) -> Result<Vec<Value>, KvError> {
        let rows = sqlx::query_scalar::<_, Json<Value>>(
            "SELECT value FROM kv_store_66a01e1b WHERE key = ANY($1) ORDER BY key",
        )
        .bind(keys)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(|Json(v)| v).collect())
    }

    async fn mset(&self, entries: Vec<(String, Value)>) -> Result<(), KvError> {
        if entries.is_empty() {
            return Ok(());
        }
        // One upsert may not touch a row twice; the last value for a key wins.
        let entries: BTreeMap<String, Value> = entries.into_iter().collect();
        let (keys, values): (Vec<String>, Vec<Json<Value>>) = entries.into_iter().map(|(k, v)| (k, Json(v))).unzip();
        sqlx::query(
            "INSERT INTO kv_store_66a01e1b (key, value)
             SELECT * FROM UNNEST($1::text[], $2::jsonb[])
             ON CONFLICT (key) DO UPDATE SET value = EXCLUDED.value",
        )
        .bind(keys)
        .bind(values)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn mdel(&self, keys: &[String]) -> Result<(), KvError> {
        sqlx::query("DELETE FROM kv_store_66a01e1b WHERE key = ANY($1)")
            .bind(keys)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}

#[cfg(all(test, feature = "live-db-tests"))]
#[path = "postgres_test.rs"]
mod tests;
