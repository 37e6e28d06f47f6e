//! Key/value access to durable storage.

use std::future::Future;

use chrono::Utc;
use serde::de::DeserializeOwned;
use serde::Serialize;
use sqlx::{Row, SqlitePool};

use crate::errors::AppError;

/// Client-local style key/value persistence.
///
/// Values are opaque strings; callers decide the encoding (JSON everywhere in
/// this crate).
pub trait KeyValueStore: Send + Sync + 'static {
    /// Read the value under `key`, if any.
    fn get(&self, key: &str) -> impl Future<Output = Result<Option<String>, AppError>> + Send;

    /// Insert or overwrite the value under `key`.
    fn set(&self, key: &str, value: &str) -> impl Future<Output = Result<(), AppError>> + Send;

    /// Remove `key`. Removing an absent key is not an error.
    fn remove(&self, key: &str) -> impl Future<Output = Result<(), AppError>> + Send;
}

/// SQLite implementation of [`KeyValueStore`].
#[derive(Clone)]
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

impl KeyValueStore for SqliteStore {
    async fn get(&self, key: &str) -> Result<Option<String>, AppError> {
        let row = sqlx::query("SELECT value FROM kv WHERE key = ?")
            .bind(key)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(|r| r.get("value")))
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), AppError> {
        let now = Utc::now().to_rfc3339();
        sqlx::query(
            "INSERT INTO kv (key, value, updated_at) VALUES (?, ?, ?) \
             ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at",
        )
        .bind(key)
        .bind(value)
        .bind(&now)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), AppError> {
        sqlx::query("DELETE FROM kv WHERE key = ?")
            .bind(key)
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}

/// Serialize `value` as JSON and store it under `key`.
pub async fn write_json<S, T>(store: &S, key: &str, value: &T) -> Result<(), AppError>
where
    S: KeyValueStore,
    T: Serialize + ?Sized,
{
    let encoded = serde_json::to_string(value)?;
    store.set(key, &encoded).await
}

/// Read a JSON document, falling back to `T::default()` when the key is absent
/// or its content does not parse. Read failures still propagate.
pub async fn read_json_or_default<S, T>(store: &S, key: &str) -> Result<T, AppError>
where
    S: KeyValueStore,
    T: DeserializeOwned + Default,
{
    let Some(raw) = store.get(key).await? else {
        return Ok(T::default());
    };

    match serde_json::from_str(&raw) {
        Ok(value) => Ok(value),
        Err(e) => {
            tracing::warn!("Ignoring malformed content under '{}': {}", key, e);
            Ok(T::default())
        }
    }
}

/// Read a JSON document for a read-modify-write cycle. An absent key reads as
/// `T::default()`; content that does not parse is a storage error, so the
/// caller never writes over data it could not read.
pub async fn read_json_for_update<S, T>(store: &S, key: &str) -> Result<T, AppError>
where
    S: KeyValueStore,
    T: DeserializeOwned + Default,
{
    let Some(raw) = store.get(key).await? else {
        return Ok(T::default());
    };

    serde_json::from_str(&raw).map_err(|e| {
        tracing::error!("Refusing to overwrite malformed content under '{}': {}", key, e);
        AppError::Storage(format!("Stored '{}' data is unreadable", key))
    })
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;
    use crate::db::init_database;

    async fn sqlite_store() -> (SqliteStore, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let pool = init_database(&temp_dir.path().join("kv.sqlite"))
            .await
            .unwrap();
        (SqliteStore::new(pool), temp_dir)
    }

    #[tokio::test]
    async fn test_set_get_overwrite_remove() {
        let (store, _dir) = sqlite_store().await;

        assert_eq!(store.get("doctors").await.unwrap(), None);

        store.set("doctors", "[]").await.unwrap();
        assert_eq!(store.get("doctors").await.unwrap().as_deref(), Some("[]"));

        store.set("doctors", "[1]").await.unwrap();
        assert_eq!(store.get("doctors").await.unwrap().as_deref(), Some("[1]"));

        store.remove("doctors").await.unwrap();
        assert_eq!(store.get("doctors").await.unwrap(), None);

        // absent key
        store.remove("doctors").await.unwrap();
    }

    #[tokio::test]
    async fn test_values_survive_reopen() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("kv.sqlite");

        {
            let store = SqliteStore::new(init_database(&path).await.unwrap());
            store.set("currentUser", r#"{"role":"admin"}"#).await.unwrap();
        }

        let store = SqliteStore::new(init_database(&path).await.unwrap());
        assert_eq!(
            store.get("currentUser").await.unwrap().as_deref(),
            Some(r#"{"role":"admin"}"#)
        );
    }

    #[tokio::test]
    async fn test_read_json_or_default_recovers_from_garbage() {
        let (store, _dir) = sqlite_store().await;

        let empty: Vec<u32> = read_json_or_default(&store, "inventory").await.unwrap();
        assert!(empty.is_empty());

        store.set("inventory", "{not json").await.unwrap();
        let recovered: Vec<u32> = read_json_or_default(&store, "inventory").await.unwrap();
        assert!(recovered.is_empty());

        write_json(&store, "inventory", &vec![1u32, 2, 3]).await.unwrap();
        let values: Vec<u32> = read_json_or_default(&store, "inventory").await.unwrap();
        assert_eq!(values, vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn test_read_json_for_update_rejects_garbage() {
        let (store, _dir) = sqlite_store().await;

        let empty: Vec<u32> = read_json_for_update(&store, "doctors").await.unwrap();
        assert!(empty.is_empty());

        store.set("doctors", "{not json").await.unwrap();
        let err = read_json_for_update::<_, Vec<u32>>(&store, "doctors")
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Storage(_)));
        assert_eq!(store.get("doctors").await.unwrap().as_deref(), Some("{not json"));
    }
}
