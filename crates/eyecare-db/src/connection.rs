use crate::error::{DbError, Result};
use eyecare_common::config::StorageConfig;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous};
use sqlx::{Pool, Sqlite};
use std::path::Path;
use std::time::Duration;
use tracing::info;

/// Connection settings for the key-value database file.
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub path: String,
    /// Gateway calls are single-row statements
    pub max_connections: u32,
    /// Wait on a locked database before a write is reported as failed
    pub busy_timeout: Duration,
}

impl DatabaseConfig {
    pub fn new(path: impl Into<String>) -> Self {
        Self { path: path.into(), ..Self::default() }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: "eyecare.db".to_string(),
            max_connections: 2,
            busy_timeout: Duration::from_secs(5),
        }
    }
}

impl From<&StorageConfig> for DatabaseConfig {
    fn from(config: &StorageConfig) -> Self {
        Self::new(config.path.clone())
    }
}

#[derive(Clone)]
pub struct Database {
    pub pool: Option<Pool<Sqlite>>,
}

impl Database {
    pub async fn new(config: DatabaseConfig) -> Result<Self> {
        if config.path.trim().is_empty() {
            return Err(DbError::InvalidData("Database path is empty".to_string()));
        }

        let pool = Self::create_pool(&config).await?;

        Ok(Self { pool: Some(pool) })
    }

    async fn create_pool(config: &DatabaseConfig) -> Result<Pool<Sqlite>> {
        let path = Path::new(&config.path);

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                std::fs::create_dir_all(parent)?;
                info!("Created data directory: {}", parent.display());
            }
        }

        // Committed writes must survive process exit
        let options = SqliteConnectOptions::new()
            .filename(path)
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal)
            .busy_timeout(config.busy_timeout);

        let pool = SqlitePoolOptions::new()
            .max_connections(config.max_connections)
            .connect_with(options)
            .await?;

        info!("Opened key-value database at {}", config.path);

        Ok(pool)
    }

    pub fn pool(&self) -> Result<&Pool<Sqlite>> {
        self.pool
            .as_ref()
            .ok_or_else(|| DbError::InvalidData("Database pool not initialized".to_string()))
    }

    pub async fn close(mut self) {
        if let Some(pool) = self.pool.take() {
            pool.close().await;
            info!("Key-value database closed");
        }
    }
}
