//! Page-level catalog queries.

use std::sync::Arc;

use tracing::{debug, instrument};

use seoul_stash_core::{Category, FacetDescriptor, Product, ProductId, SelectedFacets};

use super::facets::{facets_for_category, matches_selection};
use super::{CatalogError, ProductFilter, ProductRepository};

/// Tags that mark a product as featured.
pub const FEATURED_TAGS: [&str; 2] = ["Best Seller", "Editor's Pick"];

/// Tag that marks a new arrival.
pub const NEW_TAG: &str = "New";

/// Tags that mark a product as on offer.
pub const OFFER_TAGS: [&str; 4] = ["17% OFF", "20% OFF", "25% OFF", "Sale"];

/// Turn a route slug into a category name: `k-beauty` becomes `K-Beauty`.
///
/// Each `-`-separated word gets an upper-case first letter; the rest of the
/// word and the hyphens are kept.
#[must_use]
pub fn category_name_from_slug(slug: &str) -> String {
    slug.trim()
        .split('-')
        .map(|word| {
            let mut chars = word.chars();
            chars.next().map_or_else(String::new, |first| {
                first.to_uppercase().chain(chars).collect()
            })
        })
        .collect::<Vec<_>>()
        .join("-")
}

/// Query façade over a [`ProductRepository`].
///
/// Stateless apart from the repository handle; cheap to clone.
#[derive(Clone)]
pub struct CatalogQueryEngine {
    repository: Arc<dyn ProductRepository>,
}

impl CatalogQueryEngine {
    /// Create an engine over `repository`.
    #[must_use]
    pub fn new(repository: Arc<dyn ProductRepository>) -> Self {
        Self { repository }
    }

    /// Products in `category` (case-insensitive) that satisfy `selected`.
    ///
    /// A blank category yields an empty list.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::Retrieval`] if the repository fails.
    #[instrument(skip(self, selected), fields(active_facets = selected.active().count()))]
    pub async fn list_by_category(
        &self,
        category: &str,
        selected: &SelectedFacets,
    ) -> Result<Vec<Product>, CatalogError> {
        let category = category.trim();
        if category.is_empty() {
            return Ok(Vec::new());
        }

        let products = self
            .repository
            .list(&ProductFilter::category(category))
            .await?;

        if selected.is_unconstrained() {
            return Ok(products);
        }

        let matching: Vec<Product> = products
            .into_iter()
            .filter(|p| matches_selection(p, selected))
            .collect();
        debug!(matched = matching.len(), "Applied facet selection");
        Ok(matching)
    }

    /// Best sellers and editor's picks.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::Retrieval`] if the repository fails.
    #[instrument(skip(self))]
    pub async fn list_featured(&self) -> Result<Vec<Product>, CatalogError> {
        self.list_tagged(&FEATURED_TAGS).await
    }

    /// New arrivals.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::Retrieval`] if the repository fails.
    #[instrument(skip(self))]
    pub async fn list_new(&self) -> Result<Vec<Product>, CatalogError> {
        self.list_tagged(&[NEW_TAG]).await
    }

    /// Discounted products across all categories.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::Retrieval`] if the repository fails.
    #[instrument(skip(self))]
    pub async fn list_offers(&self) -> Result<Vec<Product>, CatalogError> {
        self.list_tagged(&OFFER_TAGS).await
    }

    async fn list_tagged(&self, tags: &[&str]) -> Result<Vec<Product>, CatalogError> {
        let filter = ProductFilter::tags_any(tags.iter().copied());
        Ok(self.repository.list(&filter).await?)
    }

    /// Products whose name or category contains `text` (case-insensitive).
    ///
    /// Empty input yields an empty list, never the whole catalog. The text is
    /// matched as given, surrounding whitespace included.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::Retrieval`] if the repository fails.
    #[instrument(skip(self))]
    pub async fn search(&self, text: &str) -> Result<Vec<Product>, CatalogError> {
        if text.is_empty() {
            return Ok(Vec::new());
        }
        let needle = text.to_lowercase();

        let products = self.repository.list(&ProductFilter::all()).await?;
        Ok(products
            .into_iter()
            .filter(|p| {
                p.name.to_lowercase().contains(&needle)
                    || p.category.to_lowercase().contains(&needle)
            })
            .collect())
    }

    /// A single product.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::NotFound`] for an unknown ID, or
    /// [`CatalogError::Retrieval`] if the repository fails.
    #[instrument(skip(self), fields(product_id = %id))]
    pub async fn get_by_id(&self, id: &ProductId) -> Result<Product, CatalogError> {
        self.repository
            .get_by_id(id)
            .await?
            .ok_or_else(|| CatalogError::NotFound(id.clone()))
    }

    /// Facet descriptors for `category`.
    #[must_use]
    #[allow(clippy::unused_self)]
    pub fn list_facets_for_category(&self, category: &str) -> Vec<FacetDescriptor> {
        facets_for_category(category.trim())
    }

    /// All top-level categories.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::Retrieval`] if the repository fails.
    #[instrument(skip(self))]
    pub async fn list_categories(&self) -> Result<Vec<Category>, CatalogError> {
        Ok(self.repository.categories().await?)
    }
}
