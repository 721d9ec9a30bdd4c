//! Wishlist store.
//!
//! Entries are full product snapshots, at most one per product ID.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::instrument;

use seoul_stash_core::{Product, ProductId};

use super::{CollectionPolicy, Commit, PersistedCollection, StoreError};
use crate::persistence::PersistenceAdapter;

/// Storage key for the wishlist document.
pub const WISHLIST_STORAGE_KEY: &str = "seoulstash_wishlist";

/// A wishlist mutation.
#[derive(Debug, Clone, PartialEq)]
pub enum WishlistAction {
    /// Save a product; no-op if it is already saved.
    Add(Product),
    /// Forget a product.
    Remove(ProductId),
}

/// Immutable view of the wishlist contents.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WishlistState {
    entries: Vec<Product>,
}

impl WishlistState {
    /// Build a state from entries, as stored.
    #[must_use]
    pub const fn from_entries(entries: Vec<Product>) -> Self {
        Self { entries }
    }

    /// Pure transition: the state that results from applying `action`.
    #[must_use]
    pub fn reduce(&self, action: WishlistAction) -> Self {
        Self {
            entries: reduce_entries(&self.entries, action),
        }
    }

    /// Saved products in the order they were added.
    #[must_use]
    pub fn entries(&self) -> &[Product] {
        &self.entries
    }

    /// Whether `id` is saved.
    #[must_use]
    pub fn contains(&self, id: &ProductId) -> bool {
        self.entries.iter().any(|p| &p.id == id)
    }

    /// Number of saved products.
    #[must_use]
    pub fn item_count(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing is saved.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn reduce_entries(entries: &[Product], action: WishlistAction) -> Vec<Product> {
    match action {
        WishlistAction::Add(product) => {
            let mut next = entries.to_vec();
            if !entries.iter().any(|p| p.id == product.id) {
                next.push(product);
            }
            next
        }
        WishlistAction::Remove(id) => entries.iter().filter(|p| p.id != id).cloned().collect(),
    }
}

/// Wishlist rules for [`PersistedCollection`].
pub struct WishlistPolicy;

impl CollectionPolicy for WishlistPolicy {
    type Item = Product;
    type Action = WishlistAction;

    const NAME: &'static str = "wishlist";

    fn key_of(item: &Product) -> &ProductId {
        &item.id
    }

    fn reduce(items: &[Product], action: WishlistAction) -> Vec<Product> {
        reduce_entries(items, action)
    }

    // First snapshot wins.
    fn merge(_existing: &mut Product, _duplicate: Product) {}
}

/// The shopper's wishlist, persisted under [`WISHLIST_STORAGE_KEY`].
#[derive(Clone)]
pub struct WishlistStore {
    entries: PersistedCollection<WishlistPolicy>,
}

impl WishlistStore {
    /// Load the wishlist from `storage`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Retrieval`] if storage cannot be read.
    pub async fn open(storage: Arc<dyn PersistenceAdapter>) -> Result<Self, StoreError> {
        Self::open_with_key(storage, WISHLIST_STORAGE_KEY).await
    }

    /// Load the wishlist from `storage` under a custom key.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Retrieval`] if storage cannot be read.
    pub async fn open_with_key(
        storage: Arc<dyn PersistenceAdapter>,
        key: &str,
    ) -> Result<Self, StoreError> {
        Ok(Self {
            entries: PersistedCollection::open(storage, key).await?,
        })
    }

    /// Storage key the wishlist writes to.
    #[must_use]
    pub fn key(&self) -> &str {
        self.entries.key()
    }

    /// Save `product`. Saving an already saved ID changes nothing.
    #[instrument(skip(self, product), fields(product_id = %product.id))]
    pub async fn add_to_wishlist(&self, product: Product) -> Commit<WishlistState> {
        self.apply(WishlistAction::Add(product)).await
    }

    /// Forget `id`, if saved.
    #[instrument(skip(self), fields(product_id = %id))]
    pub async fn remove_from_wishlist(&self, id: &ProductId) -> Commit<WishlistState> {
        self.apply(WishlistAction::Remove(id.clone())).await
    }

    /// Apply an arbitrary action.
    pub async fn apply(&self, action: WishlistAction) -> Commit<WishlistState> {
        self.entries
            .dispatch(action)
            .await
            .map(WishlistState::from_entries)
    }

    /// Whether `id` is saved.
    pub async fn is_in_wishlist(&self, id: &ProductId) -> bool {
        self.entries
            .read(|entries| entries.iter().any(|p| &p.id == id))
            .await
    }

    /// Number of saved products.
    pub async fn item_count(&self) -> usize {
        self.entries.read(<[Product]>::len).await
    }

    /// Current wishlist contents.
    pub async fn state(&self) -> WishlistState {
        WishlistState::from_entries(self.entries.snapshot().await)
    }
}
