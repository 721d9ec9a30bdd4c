//! Caching decorator for product repositories.

use std::time::Duration;

use async_trait::async_trait;
use moka::future::Cache;
use tracing::{debug, instrument};

use seoul_stash_core::{Category, Product, ProductId};

use super::{ProductFilter, ProductRepository, RepositoryError};

/// Default time-to-live for cached entries (5 minutes).
pub const DEFAULT_TTL: Duration = Duration::from_secs(300);

/// Default maximum number of cached entries.
pub const DEFAULT_CAPACITY: u64 = 1000;

/// Cache key for repository calls.
#[derive(Debug, Clone, Hash, PartialEq, Eq)]
enum CacheKey {
    Product(ProductId),
    Products(ProductFilter),
    Categories,
}

/// Cached value types.
#[derive(Debug, Clone)]
enum CacheValue {
    Product(Box<Product>),
    Products(Vec<Product>),
    Categories(Vec<Category>),
}

/// Wraps a [`ProductRepository`] with a `moka` TTL cache.
///
/// Successful lookups are cached, empty lists included. A missing product or
/// a repository error always reaches the inner repository on the next call.
pub struct CachedProductRepository<R> {
    inner: R,
    cache: Cache<CacheKey, CacheValue>,
}

impl<R: ProductRepository> CachedProductRepository<R> {
    /// Wrap `inner` with the default TTL and capacity.
    #[must_use]
    pub fn new(inner: R) -> Self {
        Self::with_settings(inner, DEFAULT_TTL, DEFAULT_CAPACITY)
    }

    /// Wrap `inner` with a custom TTL and capacity.
    #[must_use]
    pub fn with_settings(inner: R, ttl: Duration, capacity: u64) -> Self {
        let cache = Cache::builder()
            .max_capacity(capacity)
            .time_to_live(ttl)
            .build();
        Self { inner, cache }
    }
}

#[async_trait]
impl<R: ProductRepository> ProductRepository for CachedProductRepository<R> {
    #[instrument(skip(self))]
    async fn list(&self, filter: &ProductFilter) -> Result<Vec<Product>, RepositoryError> {
        let key = CacheKey::Products(filter.clone());
        if let Some(CacheValue::Products(products)) = self.cache.get(&key).await {
            debug!("Cache hit for products");
            return Ok(products);
        }

        let products = self.inner.list(filter).await?;
        self.cache
            .insert(key, CacheValue::Products(products.clone()))
            .await;
        Ok(products)
    }

    #[instrument(skip(self), fields(product_id = %id))]
    async fn get_by_id(&self, id: &ProductId) -> Result<Option<Product>, RepositoryError> {
        let key = CacheKey::Product(id.clone());
        if let Some(CacheValue::Product(product)) = self.cache.get(&key).await {
            debug!("Cache hit for product");
            return Ok(Some(*product));
        }

        let product = self.inner.get_by_id(id).await?;
        if let Some(product) = &product {
            self.cache
                .insert(key, CacheValue::Product(Box::new(product.clone())))
                .await;
        }
        Ok(product)
    }

    #[instrument(skip(self))]
    async fn categories(&self) -> Result<Vec<Category>, RepositoryError> {
        if let Some(CacheValue::Categories(categories)) = self.cache.get(&CacheKey::Categories).await
        {
            debug!("Cache hit for categories");
            return Ok(categories);
        }

        let categories = self.inner.categories().await?;
        self.cache
            .insert(CacheKey::Categories, CacheValue::Categories(categories.clone()))
            .await;
        Ok(categories)
    }
}
