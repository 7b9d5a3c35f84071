use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::connection::Database;
use crate::error::Result;
use crate::queries::KvQueries;

/// Raw string storage underneath the JSON gateway.
#[async_trait]
pub trait StorageBackend: Send + Sync {
    fn name(&self) -> &'static str;

    async fn get(&self, key: &str) -> Result<Option<String>>;

    async fn set(&self, key: &str, value: &str) -> Result<()>;

    async fn remove(&self, key: &str) -> Result<()>;

    async fn contains(&self, key: &str) -> Result<bool>;

    async fn remove_many(&self, keys: &[String]) -> Result<()>;
}

pub struct SqliteBackend {
    db: Database,
}

impl SqliteBackend {
    pub fn new(db: Database) -> Self {
        Self { db }
    }
}

#[async_trait]
impl StorageBackend for SqliteBackend {
    fn name(&self) -> &'static str {
        "sqlite"
    }

    async fn get(&self, key: &str) -> Result<Option<String>> {
        KvQueries::get(&self.db, key).await
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        KvQueries::set(&self.db, key, value).await
    }

    async fn remove(&self, key: &str) -> Result<()> {
        KvQueries::delete(&self.db, key).await.map(|_| ())
    }

    async fn contains(&self, key: &str) -> Result<bool> {
        KvQueries::exists(&self.db, key).await
    }

    async fn remove_many(&self, keys: &[String]) -> Result<()> {
        KvQueries::delete_many(&self.db, keys).await.map(|_| ())
    }
}

/// Process-lifetime map used when no durable backend is available.
#[derive(Clone, Default)]
pub struct MemoryBackend {
    entries: Arc<RwLock<HashMap<String, String>>>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl StorageBackend for MemoryBackend {
    fn name(&self) -> &'static str {
        "memory"
    }

    async fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.read().await.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        self.entries.write().await.insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<()> {
        self.entries.write().await.remove(key);
        Ok(())
    }

    async fn contains(&self, key: &str) -> Result<bool> {
        Ok(self.entries.read().await.contains_key(key))
    }

    async fn remove_many(&self, keys: &[String]) -> Result<()> {
        let mut entries = self.entries.write().await;
        for key in keys {
            entries.remove(key);
        }
        Ok(())
    }
}
