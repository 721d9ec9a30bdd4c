//! Integration tests for the cart store.
//!
//! These tests exercise the cart through real storage adapters: reload
//! round-trips, write ordering under concurrency, and degraded durability.

#![allow(clippy::unwrap_used)]

use std::sync::Arc;

use rust_decimal::Decimal;

use seoul_stash_core::{CartLine, Product, ProductId};
use seoul_stash_integration_tests::{FlakyStorage, scratch_dir, seed_repository, snack};
use seoul_stash_storefront::catalog::ProductRepository;
use seoul_stash_storefront::checkout::{CartSummary, ShippingPolicy};
use seoul_stash_storefront::persistence::{FileStorage, InMemoryStorage, PersistenceAdapter};
use seoul_stash_storefront::store::cart::CART_STORAGE_KEY;
use seoul_stash_storefront::store::{CartState, CartStore, StoreError};

// =============================================================================
// Round-trip Tests
// =============================================================================

#[tokio::test]
async fn test_reload_is_field_equal() {
    let storage = InMemoryStorage::new();
    let repo = seed_repository().await;

    let cart = CartStore::open(Arc::new(storage.clone())).await.unwrap();
    for id in ["kb1", "kb1", "s2", "s3"] {
        let product = repo.get_by_id(&ProductId::new(id)).await.unwrap().unwrap();
        assert!(cart.add_to_cart(product).await.is_durable());
    }
    let _ = cart.update_quantity(&ProductId::new("s3"), 4).await;
    let before = cart.state().await;

    let reloaded = CartStore::open(Arc::new(storage)).await.unwrap();
    let after = reloaded.state().await;

    assert_eq!(before, after);
    assert_eq!(after.total_price(), before.total_price());
    assert_eq!(after.line(&"kb1".into()).unwrap().quantity, 2);
}

#[tokio::test]
async fn test_prices_survive_file_round_trip_exactly() {
    let dir = scratch_dir();
    let cart = CartStore::open(Arc::new(FileStorage::new(&dir))).await.unwrap();

    // 3 x 0.10 must stay exactly 0.30.
    let dime = snack("dime", 10);
    for _ in 0..3 {
        let _ = cart.add_to_cart(dime.clone()).await;
    }

    let reloaded = CartStore::open(Arc::new(FileStorage::new(&dir))).await.unwrap();
    assert_eq!(reloaded.total_price().await, Decimal::new(30, 2));
    assert_eq!(reloaded.state().await, cart.state().await);

    tokio::fs::remove_dir_all(&dir).await.unwrap();
}

#[tokio::test]
async fn test_document_is_plain_json_array() {
    let storage = InMemoryStorage::new();
    let cart = CartStore::open(Arc::new(storage.clone())).await.unwrap();
    let _ = cart.add_to_cart(snack("s1", 699)).await;

    let stored = storage.get(CART_STORAGE_KEY).await.unwrap().unwrap();
    let lines: Vec<CartLine> = serde_json::from_str(&stored).unwrap();
    assert_eq!(lines.len(), 1);

    let raw: serde_json::Value = serde_json::from_str(&stored).unwrap();
    assert_eq!(raw[0]["product"]["price"], "6.99");
    assert_eq!(raw[0]["quantity"], 1);
}

#[tokio::test]
async fn test_huge_totals_saturate() {
    let cart = CartStore::open(Arc::new(InMemoryStorage::new())).await.unwrap();
    let price = "100000000000000000000".parse().unwrap();
    let _ = cart
        .add_to_cart(Product::new("w1", "K-Pop", "Signed Album", price))
        .await;
    let _ = cart.update_quantity(&ProductId::new("w1"), i64::MAX).await;

    assert_eq!(cart.total_price().await, Decimal::MAX);

    let summary = CartSummary::new(&cart.state().await, &ShippingPolicy::default());
    assert_eq!(summary.subtotal, Decimal::MAX);
    assert_eq!(summary.total, Decimal::MAX);
}

// =============================================================================
// Load Normalization Tests
// =============================================================================

#[tokio::test]
async fn test_duplicate_lines_are_merged_on_load() {
    let storage = InMemoryStorage::new();
    let mut zero = CartLine::new(snack("s2", 2450));
    zero.quantity = 0;
    let lines = vec![
        CartLine::new(snack("s1", 699)),
        zero,
        CartLine::new(snack("s1", 699)),
    ];
    storage
        .set(CART_STORAGE_KEY, &serde_json::to_string(&lines).unwrap())
        .await
        .unwrap();

    let cart = CartStore::open(Arc::new(storage)).await.unwrap();
    let state = cart.state().await;
    assert_eq!(state.lines().len(), 1);
    assert_eq!(state.item_count(), 2);
}

#[tokio::test]
async fn test_corrupt_document_starts_empty() {
    let storage = InMemoryStorage::new();
    storage.set(CART_STORAGE_KEY, "[{\"oops\":").await.unwrap();

    let cart = CartStore::open(Arc::new(storage.clone())).await.unwrap();
    assert_eq!(cart.state().await, CartState::default());

    // The next write replaces the corrupt document.
    let _ = cart.add_to_cart(snack("s1", 699)).await;
    let stored = storage.get(CART_STORAGE_KEY).await.unwrap().unwrap();
    assert!(serde_json::from_str::<Vec<CartLine>>(&stored).is_ok());
}

#[tokio::test]
async fn test_invalid_key_fails_to_open() {
    let storage = FileStorage::new(scratch_dir());
    let result = CartStore::open_with_key(Arc::new(storage), "../escape").await;
    assert!(matches!(result, Err(StoreError::Retrieval { .. })));
}

// =============================================================================
// Ordering Tests
// =============================================================================

#[tokio::test]
async fn test_concurrent_mutations_persist_final_state() {
    let storage = InMemoryStorage::new();
    let cart = CartStore::open(Arc::new(storage.clone())).await.unwrap();

    let mut handles = Vec::new();
    for i in 0..50_u32 {
        let cart = cart.clone();
        handles.push(tokio::spawn(async move {
            let product = snack(&format!("p{}", i % 5), 100 + i % 5);
            let _ = cart.add_to_cart(product).await;
            if i % 7 == 0 {
                let _ = cart
                    .update_quantity(&ProductId::new(format!("p{}", i % 5)), i64::from(i))
                    .await;
            }
        }));
    }
    for handle in handles {
        handle.await.unwrap();
    }

    let in_memory = cart.state().await;
    let stored = storage.get(CART_STORAGE_KEY).await.unwrap().unwrap();
    let persisted = CartState::from_lines(serde_json::from_str(&stored).unwrap());
    assert_eq!(persisted, in_memory);
    assert!(in_memory.lines().iter().all(|line| line.quantity >= 1));
}

#[tokio::test]
async fn test_sequential_adds_are_all_counted() {
    let cart = CartStore::open(Arc::new(InMemoryStorage::new())).await.unwrap();

    let handles: Vec<_> = (0..20)
        .map(|_| {
            let cart = cart.clone();
            tokio::spawn(async move {
                let _ = cart.add_to_cart(snack("s1", 699)).await;
            })
        })
        .collect();
    for handle in handles {
        handle.await.unwrap();
    }

    assert_eq!(cart.item_count().await, 20);
}

// =============================================================================
// Degraded Durability Tests
// =============================================================================

#[tokio::test]
async fn test_failed_write_is_reported_but_applied() {
    let storage = FlakyStorage::new();
    let cart = CartStore::open(Arc::new(storage.clone())).await.unwrap();

    let _ = cart.add_to_cart(snack("s1", 699)).await;
    storage.fail_writes(true);

    let commit = cart.add_to_cart(snack("s1", 699)).await;
    assert!(commit.changed());
    assert!(!commit.is_durable());
    assert_eq!(commit.warning().unwrap().key, CART_STORAGE_KEY);
    assert_eq!(commit.state().item_count(), 2);
    assert_eq!(cart.item_count().await, 2);

    // Storage still holds the last durable state.
    let stored = storage.inner().get(CART_STORAGE_KEY).await.unwrap().unwrap();
    let persisted: Vec<CartLine> = serde_json::from_str(&stored).unwrap();
    assert_eq!(persisted.first().unwrap().quantity, 1);

    let err = cart.clear_cart().await.into_result().unwrap_err();
    assert!(err.to_string().contains(CART_STORAGE_KEY));
}

#[tokio::test]
async fn test_write_after_recovery_catches_up() {
    let storage = FlakyStorage::new();
    let cart = CartStore::open(Arc::new(storage.clone())).await.unwrap();

    storage.fail_writes(true);
    assert!(!cart.add_to_cart(snack("s1", 699)).await.is_durable());

    storage.fail_writes(false);
    assert!(cart.add_to_cart(snack("s2", 2450)).await.is_durable());

    let reloaded = CartStore::open(Arc::new(storage.inner().clone())).await.unwrap();
    assert_eq!(reloaded.state().await, cart.state().await);
}
