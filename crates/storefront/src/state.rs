//! Application state shared across callers.

use std::sync::Arc;

use tracing::info;

use seoul_stash_core::CustomerId;

use crate::catalog::{
    CachedProductRepository, CatalogQueryEngine, InMemoryProductRepository, ProductRepository,
};
use crate::checkout::{CartSummary, CheckoutError, OrderDraft};
use crate::config::{StorageBackend, StorefrontConfig};
use crate::db;
use crate::error::StorefrontError;
use crate::persistence::{FileStorage, InMemoryStorage, PersistenceAdapter, PgStorage};
use crate::store::{CartStore, WishlistStore};

/// Application state: configuration, catalog and the shopper's stores.
///
/// This struct is cheaply cloneable via `Arc`.
#[derive(Clone)]
pub struct Storefront {
    inner: Arc<StorefrontInner>,
}

struct StorefrontInner {
    config: StorefrontConfig,
    storage: Arc<dyn PersistenceAdapter>,
    catalog: CatalogQueryEngine,
    cart: CartStore,
    wishlist: WishlistStore,
}

impl Storefront {
    /// Build the state described by `config`.
    ///
    /// Connects the configured storage backend, loads the JSON catalog and
    /// opens the cart and wishlist.
    ///
    /// # Errors
    ///
    /// Returns an error if storage cannot be reached, the catalog cannot be
    /// loaded, or a store cannot be opened.
    pub async fn open(config: StorefrontConfig) -> Result<Self, StorefrontError> {
        let storage = connect_storage(&config).await?;
        let repository = InMemoryProductRepository::from_json_file(&config.catalog_path).await?;
        Self::with_parts(config, storage, repository).await
    }

    /// Build the state from an existing storage adapter and repository.
    ///
    /// The repository is wrapped in a [`CachedProductRepository`] using the
    /// configured cache settings.
    ///
    /// # Errors
    ///
    /// Returns [`StorefrontError::Store`] if a store cannot be opened.
    pub async fn with_parts<R>(
        config: StorefrontConfig,
        storage: Arc<dyn PersistenceAdapter>,
        repository: R,
    ) -> Result<Self, StorefrontError>
    where
        R: ProductRepository + 'static,
    {
        let cached = CachedProductRepository::with_settings(
            repository,
            config.catalog_cache.ttl,
            config.catalog_cache.capacity,
        );
        let catalog = CatalogQueryEngine::new(Arc::new(cached));
        let cart = CartStore::open(Arc::clone(&storage)).await?;
        let wishlist = WishlistStore::open(Arc::clone(&storage)).await?;

        Ok(Self {
            inner: Arc::new(StorefrontInner {
                config,
                storage,
                catalog,
                cart,
                wishlist,
            }),
        })
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Get a reference to the storage adapter.
    #[must_use]
    pub fn storage(&self) -> &Arc<dyn PersistenceAdapter> {
        &self.inner.storage
    }

    /// Get a reference to the catalog query engine.
    #[must_use]
    pub fn catalog(&self) -> &CatalogQueryEngine {
        &self.inner.catalog
    }

    /// Get a reference to the cart.
    #[must_use]
    pub fn cart(&self) -> &CartStore {
        &self.inner.cart
    }

    /// Get a reference to the wishlist.
    #[must_use]
    pub fn wishlist(&self) -> &WishlistStore {
        &self.inner.wishlist
    }

    /// Price the current cart with the configured shipping rules.
    pub async fn cart_summary(&self) -> CartSummary {
        CartSummary::new(&self.inner.cart.state().await, &self.inner.config.shipping)
    }

    /// Draft an order from the current cart.
    ///
    /// # Errors
    ///
    /// Returns [`CheckoutError::EmptyCart`] if the cart is empty.
    pub async fn checkout(&self, user_id: CustomerId) -> Result<OrderDraft, CheckoutError> {
        OrderDraft::from_cart(
            user_id,
            &self.inner.cart.state().await,
            &self.inner.config.shipping,
        )
    }
}

/// Create the storage adapter selected by `config.storage`.
///
/// # Errors
///
/// Returns [`StorefrontError::Database`] if the `PostgreSQL` pool cannot be
/// created, or [`StorefrontError::Config`] if no database URL is configured.
pub async fn connect_storage(
    config: &StorefrontConfig,
) -> Result<Arc<dyn PersistenceAdapter>, StorefrontError> {
    let storage: Arc<dyn PersistenceAdapter> = match config.storage {
        StorageBackend::File => Arc::new(FileStorage::new(&config.data_dir)),
        StorageBackend::Memory => Arc::new(InMemoryStorage::new()),
        StorageBackend::Postgres => {
            let url = config.database_url.as_ref().ok_or_else(|| {
                crate::config::ConfigError::MissingEnvVar("STOREFRONT_DATABASE_URL".to_string())
            })?;
            Arc::new(PgStorage::new(db::create_pool(url).await?))
        }
    };

    info!(backend = ?config.storage, "Storage ready");
    Ok(storage)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use seoul_stash_core::{Price, Product};

    use super::*;

    async fn storefront() -> Storefront {
        let config = StorefrontConfig {
            storage: StorageBackend::Memory,
            ..StorefrontConfig::default()
        };
        let repository = InMemoryProductRepository::new(
            vec![Product::new("s1", "Snacks", "Tteokbokki Snack Mix", Price::from_cents(699))],
            Vec::new(),
        );
        Storefront::with_parts(config, Arc::new(InMemoryStorage::new()), repository)
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_cart_summary_and_checkout() {
        let app = storefront().await;
        assert!(matches!(
            app.checkout(CustomerId::new("u1")).await,
            Err(CheckoutError::EmptyCart)
        ));

        let product = app.catalog().get_by_id(&"s1".into()).await.unwrap();
        let _ = app.cart().add_to_cart(product).await;

        let summary = app.cart_summary().await;
        assert_eq!(summary.item_count, 1);

        let draft = app.checkout(CustomerId::new("u1")).await.unwrap();
        assert_eq!(draft.total, summary.total);
    }

    #[tokio::test]
    async fn test_clones_share_stores() {
        let app = storefront().await;
        let other = app.clone();

        let product = app.catalog().get_by_id(&"s1".into()).await.unwrap();
        let _ = other.wishlist().add_to_wishlist(product).await;
        assert!(app.wishlist().is_in_wishlist(&"s1".into()).await);
    }

    #[tokio::test]
    async fn test_postgres_without_url_is_config_error() {
        let config = StorefrontConfig {
            storage: StorageBackend::Postgres,
            ..StorefrontConfig::default()
        };
        assert!(matches!(
            connect_storage(&config).await,
            Err(StorefrontError::Config(_))
        ));
    }
}
