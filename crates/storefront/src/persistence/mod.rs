//! Durable key/value storage used by the cart and wishlist stores.
//!
//! # Adapters
//!
//! - [`InMemoryStorage`] - process-local map, for tests and throwaway sessions
//! - [`FileStorage`] - one document per key in a data directory
//! - [`PgStorage`] - `storefront.kv_store` table in `PostgreSQL`
//!
//! Adapters make exactly one attempt per call. Retrying is up to the caller.

mod file;
mod memory;
mod postgres;

use async_trait::async_trait;
use thiserror::Error;

pub use file::FileStorage;
pub use memory::InMemoryStorage;
pub use postgres::PgStorage;

/// Errors that can occur when reading or writing durable storage.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Filesystem operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Value could not be encoded or decoded.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Database operation failed.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// The key cannot be stored by this adapter.
    #[error("Invalid key: {0}")]
    InvalidKey(String),

    /// Storage backend is not reachable.
    #[error("Storage unavailable: {0}")]
    Unavailable(String),
}

/// Durable key to string storage.
#[async_trait]
pub trait PersistenceAdapter: Send + Sync {
    /// Read the value stored under `key`, if any.
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Store `value` under `key`, replacing any previous value.
    async fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;
}
