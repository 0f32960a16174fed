//! SurrealDB-backed seen store - connection and operations
//!
//! Supports a local file-backed store (`surrealkv://`) for real runs and an
//! in-memory store (`mem://`) for tests.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::Deserialize;
use surrealdb::engine::any::Any;
use surrealdb::Surreal;
use tracing::{debug, info, instrument};

use crate::error::StateError;
use crate::migrations;
use crate::storage_traits::{Collection, SeenRecord, SeenStore};
use crate::Result;

/// Default on-disk location of the store, relative to the working directory.
pub const DEFAULT_STORE_PATH: &str = ".zvm-auditor/db";

/// Location and namespace of the seen store
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    /// Directory holding the SurrealKV files
    pub path: PathBuf,
    /// Namespace (default: "zvm")
    pub namespace: String,
    /// Database name (default: "auditor")
    pub database: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self::new(DEFAULT_STORE_PATH)
    }
}

impl StoreConfig {
    /// Create a configuration for the store at `path`
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            namespace: "zvm".to_string(),
            database: "auditor".to_string(),
        }
    }

    /// Set custom namespace
    pub fn with_namespace(mut self, ns: impl Into<String>) -> Self {
        self.namespace = ns.into();
        self
    }

    /// Set custom database
    pub fn with_database(mut self, db: impl Into<String>) -> Self {
        self.database = db.into();
        self
    }

    fn url(&self) -> String {
        format!("surrealkv://{}", self.path.display())
    }
}

/// SurrealDB implementation of [`SeenStore`].
///
/// Open it once at process start and pass it to whoever needs it; the
/// underlying connection is released when the last clone is dropped.
#[derive(Clone)]
pub struct SurrealSeenStore {
    db: Surreal<Any>,
}

#[derive(Deserialize)]
struct CountRow {
    count: u64,
}

impl SurrealSeenStore {
    /// Open (or create) the file-backed store described by `config`
    #[instrument(skip(config), fields(path = %config.path.display()))]
    pub async fn open(config: &StoreConfig) -> Result<Self> {
        create_store_dir(&config.path)?;

        let url = config.url();
        info!("Opening seen store at {}", url);
        let store = Self::connect(&url, &config.namespace, &config.database).await?;

        info!("Seen store opened and schema initialized");
        Ok(store)
    }

    /// Create an in-memory store for testing.
    ///
    /// Connects to `mem://`, selects `zvm/auditor`, and runs `init_schema`.
    pub async fn in_memory() -> Result<Self> {
        let store = Self::connect("mem://", "zvm", "auditor").await?;
        info!("Seen store connected (in-memory)");
        Ok(store)
    }

    async fn connect(url: &str, namespace: &str, database: &str) -> Result<Self> {
        let db = surrealdb::engine::any::connect(url)
            .await
            .map_err(|e| StateError::Connection(format!("Failed to connect to {}: {}", url, e)))?;

        db.use_ns(namespace)
            .use_db(database)
            .await
            .map_err(|e| {
                StateError::Connection(format!("Failed to select namespace/database: {}", e))
            })?;

        migrations::init_schema(&db).await?;
        Ok(Self { db })
    }
}

fn create_store_dir(path: &Path) -> Result<()> {
    std::fs::create_dir_all(path).map_err(|e| {
        StateError::Connection(format!(
            "Failed to create database directory {}: {}",
            path.display(),
            e
        ))
    })
}

#[async_trait]
impl SeenStore for SurrealSeenStore {
    #[instrument(skip(self), fields(collection = %collection))]
    async fn contains(&self, collection: Collection, identifier: &str) -> Result<bool> {
        let sql = format!(
            "SELECT identifier FROM {} WHERE identifier = $identifier LIMIT 1",
            collection.table()
        );

        let mut result = self
            .db
            .query(sql)
            .bind(("identifier", identifier.to_string()))
            .await?;

        let rows: Vec<SeenRecord> = result.take(0)?;
        Ok(!rows.is_empty())
    }

    #[instrument(skip(self), fields(collection = %collection))]
    async fn insert(&self, collection: Collection, identifier: &str) -> Result<bool> {
        if self.contains(collection, identifier).await? {
            debug!("Identifier already recorded");
            return Ok(false);
        }

        let created: Option<SeenRecord> = self
            .db
            .create(collection.table())
            .content(SeenRecord::new(identifier))
            .await?;

        created
            .map(|_| true)
            .ok_or_else(|| StateError::Query(format!("Failed to record {identifier}")))
    }

    #[instrument(skip(self), fields(collection = %collection))]
    async fn count(&self, collection: Collection) -> Result<u64> {
        let sql = format!(
            "SELECT count() AS count FROM {} GROUP ALL",
            collection.table()
        );

        let mut result = self.db.query(sql).await?;
        let rows: Vec<CountRow> = result.take(0)?;
        Ok(rows.first().map(|row| row.count).unwrap_or(0))
    }

    #[instrument(skip(self), fields(collection = %collection))]
    async fn list(&self, collection: Collection) -> Result<Vec<String>> {
        let sql = format!(
            "SELECT identifier FROM {} ORDER BY identifier ASC",
            collection.table()
        );

        let mut result = self.db.query(sql).await?;
        let rows: Vec<SeenRecord> = result.take(0)?;
        Ok(rows.into_iter().map(|row| row.identifier).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_in_memory_connection_and_schema_creation() {
        let store = SurrealSeenStore::in_memory().await;
        assert!(store.is_ok(), "Failed to connect: {:?}", store.err());
    }

    #[tokio::test]
    async fn test_insert_then_contains() {
        let store = SurrealSeenStore::in_memory().await.unwrap();

        assert!(!store.contains(Collection::Events, "E1").await.unwrap());
        assert!(store.insert(Collection::Events, "E1").await.unwrap());
        assert!(store.contains(Collection::Events, "E1").await.unwrap());
    }

    #[tokio::test]
    async fn test_second_insert_is_noop() {
        let store = SurrealSeenStore::in_memory().await.unwrap();

        assert!(store.insert(Collection::Tasks, "T1").await.unwrap());
        assert!(!store.insert(Collection::Tasks, "T1").await.unwrap());
        assert_eq!(store.count(Collection::Tasks).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_count_empty_table_is_zero() {
        let store = SurrealSeenStore::in_memory().await.unwrap();
        assert_eq!(store.count(Collection::Events).await.unwrap(), 0);
    }

    #[test]
    fn test_store_config_defaults() {
        let config = StoreConfig::default();
        assert_eq!(config.path, PathBuf::from(DEFAULT_STORE_PATH));
        assert_eq!(config.namespace, "zvm");
        assert_eq!(config.database, "auditor");
    }

    #[test]
    fn test_store_config_url() {
        let config = StoreConfig::new("/var/lib/zvm-auditor").with_database("lab");
        assert_eq!(config.url(), "surrealkv:///var/lib/zvm-auditor");
        assert_eq!(config.database, "lab");
    }
}
