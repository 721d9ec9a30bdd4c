//! Product catalog: repository boundary and query façade.
//!
//! # Architecture
//!
//! - [`ProductRepository`] - source of product and category records
//! - [`InMemoryProductRepository`] - repository seeded from a JSON catalog
//! - [`CachedProductRepository`] - `moka` TTL cache in front of any repository
//! - [`CatalogQueryEngine`] - page-level queries (category + facets, curated
//!   subsets, search, lookup)
//! - [`facets`] - static facet descriptors and the facet match predicate

mod cache;
pub mod facets;
mod memory;
mod query;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use seoul_stash_core::{Category, Product, ProductId};

pub use cache::CachedProductRepository;
pub use memory::{CatalogFile, InMemoryProductRepository};
pub use query::{CatalogQueryEngine, FEATURED_TAGS, NEW_TAG, OFFER_TAGS, category_name_from_slug};

/// Errors raised by a [`ProductRepository`].
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// The backing source cannot be reached.
    #[error("Catalog unavailable: {0}")]
    Unavailable(String),

    /// Catalog file could not be read.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Catalog document is malformed.
    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Errors raised by [`CatalogQueryEngine`].
#[derive(Debug, Error)]
pub enum CatalogError {
    /// No product has the requested ID.
    #[error("Product not found: {0}")]
    NotFound(ProductId),

    /// The repository failed.
    #[error("Catalog retrieval failed: {0}")]
    Retrieval(#[from] RepositoryError),
}

/// Repository-side product filter.
///
/// All present criteria must hold. An empty filter matches everything.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductFilter {
    /// Category name, compared case-insensitively.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    /// Product must carry at least one of these tags (exact match).
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags_any: Vec<String>,
}

impl ProductFilter {
    /// Filter matching every product.
    #[must_use]
    pub fn all() -> Self {
        Self::default()
    }

    /// Filter on a category name.
    #[must_use]
    pub fn category(category: impl Into<String>) -> Self {
        Self {
            category: Some(category.into()),
            tags_any: Vec::new(),
        }
    }

    /// Filter on products carrying any of `tags`.
    #[must_use]
    pub fn tags_any<I, S>(tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            category: None,
            tags_any: tags.into_iter().map(Into::into).collect(),
        }
    }

    /// Whether `product` satisfies the filter.
    #[must_use]
    pub fn matches(&self, product: &Product) -> bool {
        let category_ok = self
            .category
            .as_deref()
            .is_none_or(|category| product.category.to_lowercase() == category.to_lowercase());
        let tags_ok = self.tags_any.is_empty() || product.has_any_tag(&self.tags_any);
        category_ok && tags_ok
    }
}

/// Source of catalog records.
#[async_trait]
pub trait ProductRepository: Send + Sync {
    /// Products matching `filter`, in catalog order.
    async fn list(&self, filter: &ProductFilter) -> Result<Vec<Product>, RepositoryError>;

    /// A single product, or `None` if the ID is unknown.
    async fn get_by_id(&self, id: &ProductId) -> Result<Option<Product>, RepositoryError>;

    /// All top-level categories.
    async fn categories(&self) -> Result<Vec<Category>, RepositoryError>;
}
