//! Integration tests for the wishlist store.

#![allow(clippy::unwrap_used)]

use std::sync::Arc;

use seoul_stash_core::{Product, ProductId};
use seoul_stash_integration_tests::{FlakyStorage, scratch_dir, snack};
use seoul_stash_storefront::persistence::{FileStorage, InMemoryStorage, PersistenceAdapter};
use seoul_stash_storefront::store::WishlistStore;
use seoul_stash_storefront::store::wishlist::WISHLIST_STORAGE_KEY;

#[tokio::test]
async fn test_add_is_idempotent() {
    let storage = InMemoryStorage::new();
    let wishlist = WishlistStore::open(Arc::new(storage.clone())).await.unwrap();

    let first = wishlist.add_to_wishlist(snack("s1", 699)).await;
    assert!(first.changed());
    let second = wishlist.add_to_wishlist(snack("s1", 699)).await;
    assert!(!second.changed());

    assert_eq!(wishlist.item_count().await, 1);
    let stored: Vec<Product> =
        serde_json::from_str(&storage.get(WISHLIST_STORAGE_KEY).await.unwrap().unwrap()).unwrap();
    assert_eq!(stored.len(), 1);
}

#[tokio::test]
async fn test_reload_keeps_insertion_order() {
    let dir = scratch_dir();
    let wishlist = WishlistStore::open(Arc::new(FileStorage::new(&dir))).await.unwrap();
    for id in ["kb2", "s1", "kb1"] {
        let _ = wishlist.add_to_wishlist(snack(id, 1000)).await;
    }
    let _ = wishlist.remove_from_wishlist(&ProductId::new("s1")).await;

    let reloaded = WishlistStore::open(Arc::new(FileStorage::new(&dir))).await.unwrap();
    let state = reloaded.state().await;
    let ids: Vec<&str> = state.entries().iter().map(|p| p.id.as_str()).collect();
    assert_eq!(ids, ["kb2", "kb1"]);
    assert!(!reloaded.is_in_wishlist(&"s1".into()).await);

    tokio::fs::remove_dir_all(&dir).await.unwrap();
}

#[tokio::test]
async fn test_duplicate_entries_keep_first_snapshot() {
    let storage = InMemoryStorage::new();
    let mut renamed = snack("s1", 699);
    renamed.name = "Renamed later".to_string();
    let entries = vec![snack("s1", 699), snack("s2", 2450), renamed];
    storage
        .set(WISHLIST_STORAGE_KEY, &serde_json::to_string(&entries).unwrap())
        .await
        .unwrap();

    let wishlist = WishlistStore::open(Arc::new(storage)).await.unwrap();
    let state = wishlist.state().await;
    assert_eq!(state.item_count(), 2);
    assert_eq!(state.entries().first().unwrap().name, "Snack s1");
}

#[tokio::test]
async fn test_cart_and_wishlist_use_separate_keys() {
    let storage = InMemoryStorage::new();
    let shared: Arc<dyn PersistenceAdapter> = Arc::new(storage.clone());
    let wishlist = WishlistStore::open(Arc::clone(&shared)).await.unwrap();
    let cart = seoul_stash_storefront::store::CartStore::open(shared).await.unwrap();

    let _ = wishlist.add_to_wishlist(snack("s1", 699)).await;
    let _ = cart.add_to_cart(snack("s2", 2450)).await;

    assert_eq!(storage.len().await, 2);
    assert!(wishlist.is_in_wishlist(&"s1".into()).await);
    assert!(!wishlist.is_in_wishlist(&"s2".into()).await);
}

#[tokio::test]
async fn test_failed_write_keeps_memory_state() {
    let storage = FlakyStorage::new();
    storage.fail_writes(true);
    let wishlist = WishlistStore::open(Arc::new(storage.clone())).await.unwrap();

    let commit = wishlist.add_to_wishlist(snack("s1", 699)).await;
    assert!(!commit.is_durable());
    assert!(wishlist.is_in_wishlist(&"s1".into()).await);
    assert!(storage.inner().is_empty().await);
}
