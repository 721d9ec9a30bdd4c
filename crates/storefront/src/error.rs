//! Unified error type for application setup and callers that mix layers.
//!
//! Each layer keeps its own error enum; [`StorefrontError`] wraps them so
//! binaries can use a single `?`-friendly type.

use thiserror::Error;

use crate::catalog::{CatalogError, RepositoryError};
use crate::checkout::CheckoutError;
use crate::config::ConfigError;
use crate::persistence::StorageError;
use crate::store::{PersistenceWarning, StoreError};

/// Application-level error type for the storefront.
#[derive(Debug, Error)]
pub enum StorefrontError {
    /// Configuration could not be loaded.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Storage backend could not be initialised.
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// Catalog could not be loaded.
    #[error("Repository error: {0}")]
    Repository(#[from] RepositoryError),

    /// Catalog query failed.
    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),

    /// A store could not be opened.
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// A mutation was not persisted.
    #[error(transparent)]
    Persistence(#[from] PersistenceWarning),

    /// Checkout failed.
    #[error("Checkout error: {0}")]
    Checkout(#[from] CheckoutError),

    /// Database connection failed.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Result type alias for `StorefrontError`.
pub type Result<T> = std::result::Result<T, StorefrontError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_conversions_keep_messages() {
        let err: StorefrontError = CheckoutError::EmptyCart.into();
        assert_eq!(err.to_string(), "Checkout error: Cannot check out an empty cart");

        let err: StorefrontError = ConfigError::MissingEnvVar("STOREFRONT_DATABASE_URL".into()).into();
        assert!(err.to_string().contains("STOREFRONT_DATABASE_URL"));
    }
}
