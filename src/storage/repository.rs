use anyhow::{Context, Result};
use chrono::Utc;
use serde::{de::DeserializeOwned, Serialize};
use sqlx::{Row, SqlitePool};
use tracing::debug;

use super::MIGRATION_001_INITIAL;

/// Key-value store backed by a single SQLite table.
///
/// Values are opaque strings. Record lists are stored as one JSON array per
/// key and rewritten in full on every change.
pub struct Repository {
    pool: SqlitePool,
}

impl Repository {
    /// Create a new repository with the given SQLite connection pool.
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Connect to a SQLite database at the given URL.
    pub async fn connect(database_url: &str) -> Result<Self> {
        let pool = SqlitePool::connect(database_url)
            .await
            .context("Failed to connect to database")?;
        Ok(Self::new(pool))
    }

    /// Run database migrations.
    pub async fn migrate(&self) -> Result<()> {
        sqlx::query(MIGRATION_001_INITIAL)
            .execute(&self.pool)
            .await
            .context("Failed to run migration 001")?;
        Ok(())
    }

    /// Initialize a new database (connect + migrate).
    pub async fn init(database_url: &str) -> Result<Self> {
        let repo = Self::connect(database_url).await?;
        repo.migrate().await?;
        Ok(repo)
    }

    // ========================
    // Raw key-value operations
    // ========================

    /// Read the value stored under `key`, if any.
    pub async fn get(&self, key: &str) -> Result<Option<String>> {
        let row = sqlx::query("SELECT value FROM kv_store WHERE key = ?")
            .bind(key)
            .fetch_optional(&self.pool)
            .await
            .with_context(|| format!("Failed to read key {}", key))?;

        debug!(key, found = row.is_some(), "kv get");
        Ok(row.map(|r| r.get("value")))
    }

    /// Store `value` under `key`, replacing any previous value.
    pub async fn set(&self, key: &str, value: &str) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO kv_store (key, value, updated_at)
            VALUES (?, ?, ?)
            ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at
            "#,
        )
        .bind(key)
        .bind(value)
        .bind(Utc::now().to_rfc3339())
        .execute(&self.pool)
        .await
        .with_context(|| format!("Failed to write key {}", key))?;

        debug!(key, bytes = value.len(), "kv set");
        Ok(())
    }

    /// Delete `key`. Removing a missing key is not an error.
    pub async fn remove(&self, key: &str) -> Result<()> {
        sqlx::query("DELETE FROM kv_store WHERE key = ?")
            .bind(key)
            .execute(&self.pool)
            .await
            .with_context(|| format!("Failed to remove key {}", key))?;

        debug!(key, "kv remove");
        Ok(())
    }

    // ========================
    // JSON list helpers
    // ========================

    /// Decode the JSON list stored under `key`. A missing key is an empty list.
    pub async fn load_list<T: DeserializeOwned>(&self, key: &str) -> Result<Vec<T>> {
        match self.get(key).await? {
            Some(raw) => serde_json::from_str(&raw)
                .with_context(|| format!("Corrupt record list under key {}", key)),
            None => Ok(Vec::new()),
        }
    }

    /// Prepend `record` to the list under `key` and write the whole list back.
    /// Returns the new list length.
    pub async fn prepend<T>(&self, key: &str, record: &T) -> Result<usize>
    where
        T: Serialize + DeserializeOwned + Clone,
    {
        let list: Vec<T> = self.load_list(key).await?;
        let mut next = Vec::with_capacity(list.len() + 1);
        next.push(record.clone());
        next.extend(list);

        let raw = serde_json::to_string(&next).context("Failed to encode record list")?;
        self.set(key, &raw).await?;
        Ok(next.len())
    }
}
