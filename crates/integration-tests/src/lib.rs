//! Integration tests for Seoul Stash.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p seoul-stash-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `cart_store` - Cart mutations, persistence round-trips, write ordering
//! - `wishlist_store` - Wishlist mutations and reload
//! - `catalog_queries` - Catalog queries against the seed catalog
//! - `persistence` - Storage adapters
//! - `checkout` - Cart summaries and order drafts through [`Storefront`]
//!
//! This crate holds the fixtures those tests share.
//!
//! [`Storefront`]: seoul_stash_storefront::Storefront

use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;

use seoul_stash_core::{Price, Product};
use seoul_stash_storefront::catalog::InMemoryProductRepository;
use seoul_stash_storefront::persistence::{InMemoryStorage, PersistenceAdapter, StorageError};

/// Path of the seed catalog shipped with the storefront crate.
#[must_use]
pub fn seed_catalog_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../storefront/data/catalog.json")
}

/// Repository loaded from the seed catalog.
///
/// # Panics
///
/// Panics if the seed catalog is missing or malformed.
#[allow(clippy::expect_used)]
pub async fn seed_repository() -> InMemoryProductRepository {
    InMemoryProductRepository::from_json_file(seed_catalog_path())
        .await
        .expect("seed catalog should load")
}

/// A product with the given ID and price, in the `Snacks` category.
#[must_use]
pub fn snack(id: &str, cents: u32) -> Product {
    Product::new(id, "Snacks", format!("Snack {id}"), Price::from_cents(cents))
}

/// A fresh scratch directory under the system temp dir.
#[must_use]
pub fn scratch_dir() -> PathBuf {
    std::env::temp_dir().join(format!("seoul-stash-it-{}", uuid::Uuid::new_v4()))
}

/// In-memory storage whose writes can be switched off.
///
/// Reads always go to the wrapped [`InMemoryStorage`].
#[derive(Clone, Default)]
pub struct FlakyStorage {
    inner: InMemoryStorage,
    failing: Arc<AtomicBool>,
}

impl FlakyStorage {
    /// Storage that accepts writes until [`FlakyStorage::fail_writes`] is called.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Make subsequent writes fail (or succeed again).
    pub fn fail_writes(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// The wrapped storage, for inspecting what was persisted.
    #[must_use]
    pub const fn inner(&self) -> &InMemoryStorage {
        &self.inner
    }
}

#[async_trait]
impl PersistenceAdapter for FlakyStorage {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        self.inner.get(key).await
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(StorageError::Unavailable("quota exceeded".to_string()));
        }
        self.inner.set(key, value).await
    }
}
