//! Integration tests for catalog queries against the seed catalog.

#![allow(clippy::unwrap_used)]

use std::sync::Arc;

use seoul_stash_core::{Category, FacetKind, Product, ProductId, SelectedFacets};
use seoul_stash_integration_tests::seed_repository;
use seoul_stash_storefront::catalog::{
    CachedProductRepository, CatalogError, CatalogQueryEngine, category_name_from_slug,
};

async fn engine() -> CatalogQueryEngine {
    let cached = CachedProductRepository::new(seed_repository().await);
    CatalogQueryEngine::new(Arc::new(cached))
}

fn ids(products: &[Product]) -> Vec<&str> {
    products.iter().map(|p| p.id.as_str()).collect()
}

// =============================================================================
// Listing Tests
// =============================================================================

#[tokio::test]
async fn test_featured_new_and_offers() {
    let engine = engine().await;

    let featured = engine.list_featured().await.unwrap();
    assert_eq!(ids(&featured), ["kb1", "kb2"]);

    let new = engine.list_new().await.unwrap();
    assert_eq!(ids(&new), ["s1"]);

    let offers = engine.list_offers().await.unwrap();
    assert_eq!(ids(&offers), ["kb1", "kb2", "s3"]);
}

#[tokio::test]
async fn test_list_by_category_from_slug() {
    let engine = engine().await;

    let name = category_name_from_slug("k-beauty");
    assert_eq!(name, "K-Beauty");

    let products = engine
        .list_by_category(&name, &SelectedFacets::new())
        .await
        .unwrap();
    assert_eq!(ids(&products), ["kb1", "kb2", "kb3"]);

    let lower = engine
        .list_by_category("snacks", &SelectedFacets::new())
        .await
        .unwrap();
    assert_eq!(lower.len(), 3);
}

#[tokio::test]
async fn test_empty_category_has_no_products() {
    let engine = engine().await;

    let fashion = engine
        .list_by_category("K-Fashion", &SelectedFacets::new())
        .await
        .unwrap();
    assert!(fashion.is_empty());

    let blank = engine
        .list_by_category("  ", &SelectedFacets::new())
        .await
        .unwrap();
    assert!(blank.is_empty());
}

// =============================================================================
// Facet Tests
// =============================================================================

#[tokio::test]
async fn test_brand_facet_narrows_category() {
    let engine = engine().await;

    let cosrx = SelectedFacets::new().with("brand", "COSRX");
    let products = engine.list_by_category("K-Beauty", &cosrx).await.unwrap();
    assert_eq!(ids(&products), ["kb1"]);

    let either = SelectedFacets::new()
        .with("brand", "COSRX")
        .with("brand", "Laneige");
    let products = engine.list_by_category("K-Beauty", &either).await.unwrap();
    assert_eq!(ids(&products), ["kb1", "kb2"]);
}

#[tokio::test]
async fn test_facets_combine_with_and() {
    let engine = engine().await;

    let selected = SelectedFacets::new()
        .with("brand", "COSRX")
        .with("skinType", "Oily");
    let products = engine.list_by_category("K-Beauty", &selected).await.unwrap();
    assert!(products.is_empty());
}

#[tokio::test]
async fn test_facet_descriptors_per_category() {
    let engine = engine().await;

    let beauty = engine.list_facets_for_category("K-Beauty");
    let facet_ids: Vec<&str> = beauty.iter().map(|f| f.id.as_str()).collect();
    assert_eq!(facet_ids, ["skinType", "brand", "price"]);
    assert_eq!(beauty.last().unwrap().kind, FacetKind::Range);

    let fashion = engine.list_facets_for_category("K-Fashion");
    assert_eq!(fashion.len(), 1);

    assert!(engine.list_facets_for_category("Furniture").is_empty());
}

// =============================================================================
// Search and Lookup Tests
// =============================================================================

#[tokio::test]
async fn test_search_is_case_insensitive() {
    let engine = engine().await;

    let results = engine.search("PEPERO").await.unwrap();
    assert_eq!(ids(&results), ["s2"]);

    let by_category = engine.search("snacks").await.unwrap();
    assert_eq!(by_category.len(), 3);

    assert!(engine.search("").await.unwrap().is_empty());
}

#[tokio::test]
async fn test_search_text_is_not_trimmed() {
    let engine = engine().await;

    // "Pepero" starts the name, so a leading space cannot match it.
    assert!(engine.search(" pepero").await.unwrap().is_empty());
    assert_eq!(ids(&engine.search(" chips").await.unwrap()), ["s3"]);
}

#[tokio::test]
async fn test_get_by_id_and_not_found() {
    let engine = engine().await;

    let product = engine.get_by_id(&ProductId::new("kb1")).await.unwrap();
    assert_eq!(product.review_count, 9541);
    assert_eq!(product.discount_percent(), Some(17));

    let missing = engine.get_by_id(&ProductId::new("nope")).await.unwrap_err();
    assert!(matches!(missing, CatalogError::NotFound(id) if id.as_str() == "nope"));
}

#[tokio::test]
async fn test_categories_come_from_catalog() {
    let engine = engine().await;

    let categories = engine.list_categories().await.unwrap();
    let slugs: Vec<&str> = categories.iter().map(Category::slug).collect();
    assert_eq!(slugs, ["k-beauty", "k-pop", "k-fashion", "snacks"]);
    assert_eq!(category_name_from_slug(slugs.get(1).unwrap()), "K-Pop");
}
