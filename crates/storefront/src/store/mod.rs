//! Shopper state stores backed by a [`PersistenceAdapter`].
//!
//! # Architecture
//!
//! Both the cart and the wishlist are a list of items keyed by product ID,
//! changed only through actions:
//!
//! 1. A mutator builds an action and calls [`PersistedCollection::dispatch`]
//! 2. The policy's pure `reduce(items, action)` computes the next list
//! 3. The next list is committed in memory and written to storage
//! 4. The caller gets a [`Commit`] describing the new state and whether the
//!    write succeeded
//!
//! The state lock is held from step 2 through step 3, so writes for one key
//! land in the same order the mutations were issued. Separate stores do not
//! share a lock.

pub mod cart;
pub mod wishlist;

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;
use tokio::sync::Mutex;
use tracing::{debug, info, instrument, warn};

use seoul_stash_core::ProductId;

use crate::persistence::{PersistenceAdapter, StorageError};

pub use cart::{CartAction, CartState, CartStore};
pub use wishlist::{WishlistAction, WishlistState, WishlistStore};

/// Errors that can occur when opening a store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The persisted document could not be read.
    #[error("Failed to load {key}: {source}")]
    Retrieval {
        /// Storage key being read.
        key: String,
        /// Underlying storage failure.
        #[source]
        source: StorageError,
    },
}

/// A mutation was applied in memory but could not be written to storage.
#[derive(Debug, Error)]
#[error("Failed to persist {key}: {source}")]
pub struct PersistenceWarning {
    /// Storage key that was not written.
    pub key: String,
    /// Underlying storage failure.
    #[source]
    pub source: StorageError,
}

/// Outcome of a store mutation.
///
/// The in-memory state is always committed. `warning` is set when the
/// durable copy could not be updated and now lags behind.
#[derive(Debug)]
#[must_use = "a Commit may carry a persistence warning that should be surfaced"]
pub struct Commit<T> {
    state: T,
    changed: bool,
    warning: Option<PersistenceWarning>,
}

impl<T> Commit<T> {
    /// The state after the mutation.
    pub const fn state(&self) -> &T {
        &self.state
    }

    /// Consume the commit, keeping only the state.
    pub fn into_state(self) -> T {
        self.state
    }

    /// Whether the mutation changed anything. Unchanged state is not rewritten.
    pub const fn changed(&self) -> bool {
        self.changed
    }

    /// Whether storage reflects the committed state.
    pub const fn is_durable(&self) -> bool {
        self.warning.is_none()
    }

    /// The persistence failure, if any.
    pub const fn warning(&self) -> Option<&PersistenceWarning> {
        self.warning.as_ref()
    }

    /// Treat degraded durability as an error.
    ///
    /// # Errors
    ///
    /// Returns the [`PersistenceWarning`] if the write failed. The in-memory
    /// state has been committed either way.
    pub fn into_result(self) -> Result<T, PersistenceWarning> {
        match self.warning {
            None => Ok(self.state),
            Some(warning) => Err(warning),
        }
    }

    /// Convert the state, keeping the durability status.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Commit<U> {
        Commit {
            state: f(self.state),
            changed: self.changed,
            warning: self.warning,
        }
    }
}

/// Item type, transition function and merge rules for a persisted collection.
pub trait CollectionPolicy: Send + Sync + 'static {
    /// Stored item.
    type Item: Clone + PartialEq + Serialize + DeserializeOwned + Send + Sync + 'static;
    /// Mutation request.
    type Action: fmt::Debug + Send;

    /// Short name used in logs.
    const NAME: &'static str;

    /// Product ID an item is keyed by.
    fn key_of(item: &Self::Item) -> &ProductId;

    /// Pure transition from the current items to the next items.
    fn reduce(items: &[Self::Item], action: Self::Action) -> Vec<Self::Item>;

    /// Fold `duplicate` into `existing` when a loaded document repeats a key.
    fn merge(existing: &mut Self::Item, duplicate: Self::Item);

    /// Whether a loaded item may be kept at all.
    fn is_valid(_item: &Self::Item) -> bool {
        true
    }
}

/// Apply a policy's validity and merge rules to a loaded item list.
///
/// Keeps first-seen order.
pub fn normalize<P: CollectionPolicy>(items: Vec<P::Item>) -> Vec<P::Item> {
    let mut positions: HashMap<ProductId, usize> = HashMap::new();
    let mut out: Vec<P::Item> = Vec::with_capacity(items.len());

    for item in items {
        if let Some(&index) = positions.get(P::key_of(&item)) {
            if let Some(existing) = out.get_mut(index) {
                P::merge(existing, item);
            }
        } else {
            positions.insert(P::key_of(&item).clone(), out.len());
            out.push(item);
        }
    }

    out.retain(P::is_valid);
    out
}

/// A list of items owned in memory and mirrored to one storage key.
///
/// Cheap to clone; clones share the same state and write lock.
pub struct PersistedCollection<P: CollectionPolicy> {
    inner: Arc<CollectionInner<P>>,
}

struct CollectionInner<P: CollectionPolicy> {
    key: String,
    storage: Arc<dyn PersistenceAdapter>,
    items: Mutex<Vec<P::Item>>,
}

impl<P: CollectionPolicy> Clone for PersistedCollection<P> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<P: CollectionPolicy> PersistedCollection<P> {
    /// Load the collection stored under `key`.
    ///
    /// A missing document yields an empty collection. A document that cannot
    /// be decoded is logged and replaced by an empty collection on the next
    /// write.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Retrieval`] if storage cannot be read.
    #[instrument(skip(storage), fields(store = P::NAME))]
    pub async fn open(
        storage: Arc<dyn PersistenceAdapter>,
        key: &str,
    ) -> Result<Self, StoreError> {
        let stored = storage
            .get(key)
            .await
            .map_err(|source| StoreError::Retrieval {
                key: key.to_owned(),
                source,
            })?;

        let items = match stored {
            None => Vec::new(),
            Some(document) => match serde_json::from_str::<Vec<P::Item>>(&document) {
                Ok(items) => normalize::<P>(items),
                Err(e) => {
                    warn!(error = %e, "Discarding unreadable stored document");
                    Vec::new()
                }
            },
        };

        info!(items = items.len(), "Store loaded");

        Ok(Self {
            inner: Arc::new(CollectionInner {
                key: key.to_owned(),
                storage,
                items: Mutex::new(items),
            }),
        })
    }

    /// Storage key this collection writes to.
    #[must_use]
    pub fn key(&self) -> &str {
        &self.inner.key
    }

    /// Apply `action`, commit the result and persist it.
    ///
    /// Mutations are applied strictly one at a time in the order they
    /// acquire the lock.
    #[instrument(skip(self), fields(store = P::NAME))]
    pub async fn dispatch(&self, action: P::Action) -> Commit<Vec<P::Item>> {
        let mut items = self.inner.items.lock().await;
        let next = P::reduce(&items, action);

        if next == *items {
            debug!("Action left state unchanged");
            return Commit {
                state: next,
                changed: false,
                warning: None,
            };
        }

        *items = next;
        let warning = self.persist(&items).await.err().map(|source| {
            warn!(key = %self.inner.key, error = %source, "State committed in memory only");
            PersistenceWarning {
                key: self.inner.key.clone(),
                source,
            }
        });

        Commit {
            state: items.clone(),
            changed: true,
            warning,
        }
    }

    /// Copy of the current items.
    pub async fn snapshot(&self) -> Vec<P::Item> {
        self.inner.items.lock().await.clone()
    }

    /// Run `f` against the current items without cloning them.
    pub async fn read<R>(&self, f: impl FnOnce(&[P::Item]) -> R) -> R {
        f(&self.inner.items.lock().await)
    }

    async fn persist(&self, items: &[P::Item]) -> Result<(), StorageError> {
        let document = serde_json::to_string(items)?;
        self.inner.storage.set(&self.inner.key, &document).await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use async_trait::async_trait;
    use serde::Deserialize;

    use super::*;
    use crate::persistence::InMemoryStorage;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Tally {
        id: ProductId,
        count: i32,
    }

    #[derive(Debug)]
    enum TallyAction {
        Bump(&'static str),
    }

    struct TallyPolicy;

    impl CollectionPolicy for TallyPolicy {
        type Item = Tally;
        type Action = TallyAction;

        const NAME: &'static str = "tally";

        fn key_of(item: &Tally) -> &ProductId {
            &item.id
        }

        fn reduce(items: &[Tally], action: TallyAction) -> Vec<Tally> {
            let TallyAction::Bump(id) = action;
            let mut next = items.to_vec();
            match next.iter_mut().find(|t| t.id.as_str() == id) {
                Some(t) => t.count += 1,
                None => next.push(Tally {
                    id: ProductId::new(id),
                    count: 1,
                }),
            }
            next
        }

        fn merge(existing: &mut Tally, duplicate: Tally) {
            existing.count += duplicate.count;
        }

        fn is_valid(item: &Tally) -> bool {
            item.count > 0
        }
    }

    struct BrokenStorage;

    #[async_trait]
    impl PersistenceAdapter for BrokenStorage {
        async fn get(&self, _key: &str) -> Result<Option<String>, StorageError> {
            Err(StorageError::Unavailable("offline".to_string()))
        }

        async fn set(&self, _key: &str, _value: &str) -> Result<(), StorageError> {
            Err(StorageError::Unavailable("offline".to_string()))
        }
    }

    #[test]
    fn test_normalize_merges_and_drops_invalid() {
        let items = vec![
            Tally { id: "a".into(), count: 1 },
            Tally { id: "b".into(), count: -3 },
            Tally { id: "a".into(), count: 2 },
            Tally { id: "c".into(), count: 1 },
        ];
        let normalized = normalize::<TallyPolicy>(items);
        assert_eq!(
            normalized,
            vec![
                Tally { id: "a".into(), count: 3 },
                Tally { id: "c".into(), count: 1 },
            ]
        );
    }

    #[tokio::test]
    async fn test_dispatch_persists_document() {
        let storage = InMemoryStorage::new();
        let store = PersistedCollection::<TallyPolicy>::open(Arc::new(storage.clone()), "tally")
            .await
            .unwrap();

        let commit = store.dispatch(TallyAction::Bump("a")).await;
        assert!(commit.changed());
        assert!(commit.is_durable());

        let stored = storage.get("tally").await.unwrap().unwrap();
        let decoded: Vec<Tally> = serde_json::from_str(&stored).unwrap();
        assert_eq!(decoded, store.snapshot().await);
    }

    #[tokio::test]
    async fn test_open_reports_retrieval_error() {
        let result = PersistedCollection::<TallyPolicy>::open(Arc::new(BrokenStorage), "tally").await;
        assert!(matches!(result, Err(StoreError::Retrieval { .. })));
    }

    #[tokio::test]
    async fn test_open_discards_garbage() {
        let storage = InMemoryStorage::new();
        storage.set("tally", "{not json").await.unwrap();

        let store = PersistedCollection::<TallyPolicy>::open(Arc::new(storage), "tally")
            .await
            .unwrap();
        assert!(store.snapshot().await.is_empty());
    }

    #[tokio::test]
    async fn test_commit_into_result() {
        let storage = InMemoryStorage::new();
        let store = PersistedCollection::<TallyPolicy>::open(Arc::new(storage), "tally")
            .await
            .unwrap();

        let state = store.dispatch(TallyAction::Bump("x")).await.into_result().unwrap();
        assert_eq!(state.len(), 1);
    }
}
