//! Cart line items.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::id::ProductId;
use super::product::Product;

/// A product in the cart together with how many units were added.
///
/// The product is a snapshot taken when the line was created, so totals can be
/// computed without going back to the catalog. A stored line always has
/// `quantity >= 1`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartLine {
    /// Product snapshot.
    pub product: Product,
    /// Units of the product.
    pub quantity: u32,
}

impl CartLine {
    /// Create a line with a single unit.
    #[must_use]
    pub const fn new(product: Product) -> Self {
        Self {
            product,
            quantity: 1,
        }
    }

    /// The ID of the product on this line.
    #[must_use]
    pub const fn product_id(&self) -> &ProductId {
        &self.product.id
    }

    /// `price * quantity` for this line.
    #[must_use]
    pub fn line_total(&self) -> Decimal {
        self.product.price.times(self.quantity)
    }

    /// Sum of [`CartLine::line_total`] over `lines`, saturating at
    /// [`Decimal::MAX`].
    #[must_use]
    pub fn total_of(lines: &[Self]) -> Decimal {
        lines
            .iter()
            .fold(Decimal::ZERO, |total, line| total.saturating_add(line.line_total()))
    }
}
