mod local;
mod memory;

pub use local::{default_data_dir, LocalStore};
pub use memory::MemoryStore;

use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("not found: {0}")]
    NotFound(String),

    #[error("store error: {0}")]
    Internal(String),
}

/// A store for opaque blobs keyed by strings.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Write (create or overwrite) an object.
    async fn put(&self, key: &str, data: Bytes) -> Result<(), StoreError>;

    /// Read an object. Returns `StoreError::NotFound` if absent.
    async fn get(&self, key: &str) -> Result<Bytes, StoreError>;

    /// Read an object, returning `None` if it does not exist.
    async fn get_opt(&self, key: &str) -> Result<Option<Bytes>, StoreError> {
        match self.get(key).await {
            Ok(data) => Ok(Some(data)),
            Err(StoreError::NotFound(_)) => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Delete an object. No-op if absent.
    async fn delete(&self, key: &str) -> Result<(), StoreError>;

    /// Check if an object exists.
    async fn exists(&self, key: &str) -> Result<bool, StoreError> {
        match self.get(key).await {
            Ok(_) => Ok(true),
            Err(StoreError::NotFound(_)) => Ok(false),
            Err(e) => Err(e),
        }
    }
}

// -- Keys --

/// The single key the whole collection lives under.
pub const LISTS_KEY: &str = "lists";

// -- Configuration --

/// Configuration for the blob store backend.
#[derive(Debug, Clone, Default)]
pub struct StoreConfig {
    /// Base directory for `LocalStore`. `None` means the XDG default.
    pub local_data_dir: Option<PathBuf>,
    /// Keep everything in memory; nothing survives the process.
    pub in_memory: bool,
}

impl StoreConfig {
    /// Directory `LocalStore` would use.
    pub fn resolved_data_dir(&self) -> PathBuf {
        self.local_data_dir.clone().unwrap_or_else(default_data_dir)
    }
}

// -- Factory --

/// Create an `ObjectStore` from configuration.
pub fn create_store(config: &StoreConfig) -> Result<Arc<dyn ObjectStore>, StoreError> {
    if config.in_memory {
        tracing::debug!("using in-memory store");
        return Ok(Arc::new(MemoryStore::new()));
    }
    let dir = config.resolved_data_dir();
    if dir.exists() && !dir.is_dir() {
        return Err(StoreError::Internal(format!(
            "data dir {} is not a directory",
            dir.display()
        )));
    }
    tracing::debug!(dir = %dir.display(), "using local store");
    Ok(Arc::new(LocalStore::new(config)))
}
