//! In-memory product repository.

use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use tracing::{info, instrument};

use seoul_stash_core::{Category, Product, ProductId};

use super::{ProductFilter, ProductRepository, RepositoryError};

/// On-disk catalog document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CatalogFile {
    /// Products in display order.
    #[serde(default)]
    pub products: Vec<Product>,
    /// Top-level categories in display order.
    #[serde(default)]
    pub categories: Vec<Category>,
}

/// Product repository holding the whole catalog in memory.
///
/// Clones share the same data.
#[derive(Clone, Default)]
pub struct InMemoryProductRepository {
    catalog: Arc<RwLock<CatalogFile>>,
}

impl InMemoryProductRepository {
    /// Create a repository over the given records.
    #[must_use]
    pub fn new(products: Vec<Product>, categories: Vec<Category>) -> Self {
        Self::from_catalog(CatalogFile {
            products,
            categories,
        })
    }

    /// Create a repository over a parsed catalog document.
    #[must_use]
    pub fn from_catalog(catalog: CatalogFile) -> Self {
        Self {
            catalog: Arc::new(RwLock::new(catalog)),
        }
    }

    /// Load a catalog document from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns [`RepositoryError::Io`] if the file cannot be read, or
    /// [`RepositoryError::Parse`] if it is not a valid catalog.
    #[instrument(skip_all, fields(path = %path.as_ref().display()))]
    pub async fn from_json_file(path: impl AsRef<Path>) -> Result<Self, RepositoryError> {
        let raw = tokio::fs::read_to_string(path.as_ref()).await?;
        let catalog: CatalogFile = serde_json::from_str(&raw)?;
        info!(
            products = catalog.products.len(),
            categories = catalog.categories.len(),
            "Catalog loaded"
        );
        Ok(Self::from_catalog(catalog))
    }
}

#[async_trait]
impl ProductRepository for InMemoryProductRepository {
    async fn list(&self, filter: &ProductFilter) -> Result<Vec<Product>, RepositoryError> {
        let catalog = self.catalog.read().await;
        Ok(catalog
            .products
            .iter()
            .filter(|p| filter.matches(p))
            .cloned()
            .collect())
    }

    async fn get_by_id(&self, id: &ProductId) -> Result<Option<Product>, RepositoryError> {
        let catalog = self.catalog.read().await;
        Ok(catalog.products.iter().find(|p| &p.id == id).cloned())
    }

    async fn categories(&self) -> Result<Vec<Category>, RepositoryError> {
        Ok(self.catalog.read().await.categories.clone())
    }
}
