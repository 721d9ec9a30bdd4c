//! Catalog records: products and categories.
//!
//! These are owned by whatever repository backs the catalog and are
//! read-only to the rest of the system.

use std::collections::BTreeSet;

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Serialize};

use super::id::{CategoryId, ProductId};
use super::price::Price;
use super::rating::Rating;

/// A product in the catalog.
///
/// Field names serialize in camelCase to stay compatible with catalog
/// documents produced by the web storefront (`imageUrl` and `reviews` are
/// accepted as aliases).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    /// Unique, immutable product ID.
    pub id: ProductId,
    /// Category display name (e.g. `K-Beauty`).
    pub category: String,
    /// Product name shown to shoppers.
    pub name: String,
    /// Current selling price.
    pub price: Price,
    /// Price before discount, if the product is on offer.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_price: Option<Price>,
    /// Average review rating.
    #[serde(default)]
    pub rating: Rating,
    /// Number of reviews behind `rating`.
    #[serde(default, alias = "reviews")]
    pub review_count: u32,
    /// Merchandising tags (`New`, `Best Seller`, `20% OFF`, ...).
    #[serde(default)]
    pub tags: BTreeSet<String>,
    /// Image URL or asset reference.
    #[serde(default, alias = "imageUrl")]
    pub image_ref: String,
    /// Long-form description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Product {
    /// Create a product with the required fields and empty metadata.
    #[must_use]
    pub fn new(
        id: impl Into<ProductId>,
        category: impl Into<String>,
        name: impl Into<String>,
        price: Price,
    ) -> Self {
        Self {
            id: id.into(),
            category: category.into(),
            name: name.into(),
            price,
            original_price: None,
            rating: Rating::default(),
            review_count: 0,
            tags: BTreeSet::new(),
            image_ref: String::new(),
            description: None,
        }
    }

    /// Replace the tag set.
    #[must_use]
    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }

    /// Set the pre-discount price.
    #[must_use]
    pub const fn with_original_price(mut self, original_price: Price) -> Self {
        self.original_price = Some(original_price);
        self
    }

    /// Whether the product carries `tag` (exact match).
    #[must_use]
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.contains(tag)
    }

    /// Whether the product carries at least one of `tags`.
    #[must_use]
    pub fn has_any_tag<S: AsRef<str>>(&self, tags: &[S]) -> bool {
        tags.iter().any(|tag| self.has_tag(tag.as_ref()))
    }

    /// Discount relative to `original_price`, rounded to a whole percent.
    ///
    /// `None` unless the original price is strictly higher than the price.
    #[must_use]
    pub fn discount_percent(&self) -> Option<u32> {
        let original = self.original_price?.amount();
        let price = self.price.amount();
        if original <= price {
            return None;
        }
        ((original - price) / original * Decimal::ONE_HUNDRED)
            .round()
            .to_u32()
    }
}

/// A top-level catalog category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    /// Category ID (usually the slug).
    pub id: CategoryId,
    /// Display name, matched against [`Product::category`].
    pub name: String,
    /// Image URL or asset reference.
    #[serde(default, alias = "imageUrl")]
    pub image_ref: String,
    /// Number of products advertised for the category.
    #[serde(default)]
    pub product_count: u32,
    /// URL slug; falls back to the ID when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,
}

impl Category {
    /// The URL slug for this category.
    #[must_use]
    pub fn slug(&self) -> &str {
        self.slug.as_deref().unwrap_or_else(|| self.id.as_str())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn essence() -> Product {
        Product::new(
            "kb1",
            "K-Beauty",
            "COSRX Advanced Snail 96 Mucin Power Essence",
            Price::from_cents(2499),
        )
        .with_original_price(Price::from_cents(2999))
        .with_tags(["Best Seller", "17% OFF"])
    }

    #[test]
    fn test_tags() {
        let product = essence();
        assert!(product.has_tag("Best Seller"));
        assert!(!product.has_tag("best seller"));
        assert!(product.has_any_tag(&["New", "17% OFF"]));
        assert!(!product.has_any_tag(&["New"]));
    }

    #[test]
    fn test_discount_percent() {
        assert_eq!(essence().discount_percent(), Some(17));

        let plain = Product::new("s2", "Snacks", "Pepero", Price::from_cents(2450));
        assert_eq!(plain.discount_percent(), None);

        let odd = plain.with_original_price(Price::from_cents(1000));
        assert_eq!(odd.discount_percent(), None);
    }

    #[test]
    fn test_deserialize_web_catalog_shape() {
        let json = r#"{
            "id": "kb2",
            "category": "K-Beauty",
            "name": "Laneige Water Sleeping Mask",
            "price": "32.00",
            "originalPrice": "40.00",
            "rating": 4.9,
            "reviews": 5876,
            "tags": ["20% OFF", "Editor's Pick"],
            "imageUrl": "https://example.com/laneige.png"
        }"#;
        let product: Product = serde_json::from_str(json).unwrap();
        assert_eq!(product.id.as_str(), "kb2");
        assert_eq!(product.review_count, 5876);
        assert_eq!(product.image_ref, "https://example.com/laneige.png");
        assert_eq!(product.discount_percent(), Some(20));
        assert!(product.description.is_none());
    }

    #[test]
    fn test_category_slug_fallback() {
        let category = Category {
            id: CategoryId::new("k-pop"),
            name: "K-Pop".to_string(),
            image_ref: String::new(),
            product_count: 320,
            slug: None,
        };
        assert_eq!(category.slug(), "k-pop");
    }
}
