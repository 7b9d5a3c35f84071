//! JSON key-value storage gateway.
//!
//! Writes go to the durable backend while it works. The first failed write
//! switches the gateway to the in-memory map for the rest of the process.
//! After the switch, reads that miss the memory map still fall through to the
//! durable backend, so values stored before the failure stay visible.
//! Nothing here returns an error to the caller: failures are logged and the
//! operation degrades to a missing value or a memory-only write.

use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use eyecare_common::config::StorageConfig;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tokio::sync::RwLock;
use tracing::{debug, error, info, warn};

use crate::backend::{MemoryBackend, SqliteBackend, StorageBackend};
use crate::connection::{Database, DatabaseConfig};
use crate::error::Result;

#[derive(Clone)]
pub struct StorageService {
    durable: Option<Arc<dyn StorageBackend>>,
    durable_available: Arc<AtomicBool>,
    memory: MemoryBackend,
    // Removed after the switch to memory; never read back from the durable backend
    removed: Arc<RwLock<HashSet<String>>>,
}

impl StorageService {
    /// Memory-only gateway.
    pub fn in_memory() -> Self {
        Self {
            durable: None,
            durable_available: Arc::new(AtomicBool::new(false)),
            memory: MemoryBackend::new(),
            removed: Arc::default(),
        }
    }

    pub fn with_backend(backend: Arc<dyn StorageBackend>) -> Self {
        info!("Storage gateway using {} backend", backend.name());
        Self {
            durable: Some(backend),
            durable_available: Arc::new(AtomicBool::new(true)),
            memory: MemoryBackend::new(),
            removed: Arc::default(),
        }
    }

    /// Open the SQLite backend and run migrations, failing if either step fails.
    pub async fn connect(config: &StorageConfig) -> Result<Self> {
        let db = Database::new(DatabaseConfig::from(config)).await?;
        db.run_migrations().await?;

        Ok(Self::with_backend(Arc::new(SqliteBackend::new(db))))
    }

    /// Like [`StorageService::connect`], but degrades to memory-only storage.
    pub async fn open(config: &StorageConfig) -> Self {
        if config.in_memory {
            info!("Storage configured as in-memory only");
            return Self::in_memory();
        }

        match Self::connect(config).await {
            Ok(storage) => storage,
            Err(e) => {
                warn!("Durable storage unavailable, using in-memory storage: {}", e);
                Self::in_memory()
            }
        }
    }

    pub fn is_durable(&self) -> bool {
        self.durable.is_some() && self.durable_available.load(Ordering::SeqCst)
    }

    fn active_durable(&self) -> Option<&Arc<dyn StorageBackend>> {
        if self.durable_available.load(Ordering::SeqCst) {
            self.durable.as_ref()
        } else {
            None
        }
    }

    fn mark_durable_unavailable(&self) {
        if self.durable_available.swap(false, Ordering::SeqCst) {
            warn!("Switching storage gateway to in-memory storage for this process");
        }
    }

    pub async fn save<T: Serialize + ?Sized>(&self, key: &str, value: &T) {
        let json = match serde_json::to_string(value) {
            Ok(json) => json,
            Err(e) => {
                error!("Failed to serialize value for {}: {}", key, e);
                return;
            }
        };

        if let Some(backend) = self.active_durable() {
            match backend.set(key, &json).await {
                Ok(()) => {
                    debug!("Saved {} ({} bytes)", key, json.len());
                    return;
                }
                Err(e) => {
                    error!("Error saving {}: {}", key, e);
                    self.mark_durable_unavailable();
                }
            }
        }

        // Memory writes cannot fail
        let _ = self.memory.set(key, &json).await;
        self.removed.write().await.remove(key);
    }

    async fn read_raw(&self, key: &str) -> Option<String> {
        if let Some(backend) = self.active_durable() {
            return match backend.get(key).await {
                Ok(value) => value,
                Err(e) => {
                    error!("Error loading {}: {}", key, e);
                    self.memory.get(key).await.ok().flatten()
                }
            };
        }

        if let Ok(Some(value)) = self.memory.get(key).await {
            return Some(value);
        }
        if self.removed.read().await.contains(key) {
            return None;
        }

        let backend = self.durable.as_ref()?;
        match backend.get(key).await {
            Ok(value) => value,
            Err(e) => {
                error!("Error reading {} from {} storage: {}", key, backend.name(), e);
                None
            }
        }
    }

    pub async fn load<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let raw = self.read_raw(key).await?;

        match serde_json::from_str(&raw) {
            Ok(value) => Some(value),
            Err(e) => {
                warn!("Stored value for {} could not be decoded: {}", key, e);
                None
            }
        }
    }

    pub async fn remove(&self, key: &str) {
        match self.active_durable() {
            Some(backend) => {
                if let Err(e) = backend.remove(key).await {
                    error!("Error removing {}: {}", key, e);
                }
            }
            None if self.durable.is_some() => {
                self.removed.write().await.insert(key.to_string());
            }
            None => {}
        }
        let _ = self.memory.remove(key).await;
    }

    pub async fn has(&self, key: &str) -> bool {
        if let Some(backend) = self.active_durable() {
            match backend.contains(key).await {
                Ok(found) => return found,
                Err(e) => error!("Error checking {}: {}", key, e),
            }
            return self.memory.contains(key).await.unwrap_or(false);
        }
        self.read_raw(key).await.is_some()
    }

    /// Remove the given keys from both the durable backend and the memory map.
    pub async fn clear_all(&self, known_keys: &[String]) {
        match self.active_durable() {
            Some(backend) => {
                if let Err(e) = backend.remove_many(known_keys).await {
                    error!("Error clearing stored data: {}", e);
                }
            }
            None if self.durable.is_some() => {
                self.removed.write().await.extend(known_keys.iter().cloned());
            }
            None => {}
        }
        let _ = self.memory.remove_many(known_keys).await;
        info!("Cleared {} storage keys", known_keys.len());
    }
}
