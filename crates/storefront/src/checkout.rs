//! Cart summary and order drafts for the checkout layer.
//!
//! Payment and order storage live outside this crate; this module only
//! prices the cart and snapshots it into an [`OrderDraft`].

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, instrument};
use uuid::Uuid;

use seoul_stash_core::{CartLine, CustomerId, OrderStatus};

use crate::store::CartState;

/// Default flat shipping rate (5.99).
pub const DEFAULT_FLAT_RATE: Decimal = Decimal::from_parts(599, 0, 0, false, 2);

/// Default free-shipping threshold (50), used for the "spend X more" hint.
pub const DEFAULT_FREE_SHIPPING_THRESHOLD: Decimal = Decimal::from_parts(50, 0, 0, false, 0);

/// Errors that can occur when drafting an order.
#[derive(Debug, Error)]
pub enum CheckoutError {
    /// There is nothing to order.
    #[error("Cannot check out an empty cart")]
    EmptyCart,
}

/// Shipping rules.
///
/// Every non-empty cart pays the flat rate. The threshold only drives the
/// "spend X more for free shipping" hint and never changes the charge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShippingPolicy {
    /// Charged on any non-empty cart.
    pub flat_rate: Decimal,
    /// Subtotal advertised as the free-shipping goal.
    pub free_shipping_threshold: Decimal,
}

impl Default for ShippingPolicy {
    fn default() -> Self {
        Self {
            flat_rate: DEFAULT_FLAT_RATE,
            free_shipping_threshold: DEFAULT_FREE_SHIPPING_THRESHOLD,
        }
    }
}

impl ShippingPolicy {
    /// Shipping charged for a cart: the flat rate unless the cart is empty.
    #[must_use]
    pub const fn shipping_for(&self, is_empty: bool) -> Decimal {
        if is_empty {
            Decimal::ZERO
        } else {
            self.flat_rate
        }
    }

    /// How far `subtotal` is from the free-shipping threshold, never negative.
    #[must_use]
    pub fn amount_until_free_shipping(&self, subtotal: Decimal) -> Decimal {
        (self.free_shipping_threshold - subtotal).max(Decimal::ZERO)
    }
}

/// Priced view of a cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartSummary {
    /// Total units in the cart.
    pub item_count: u64,
    /// Sum of line totals.
    pub subtotal: Decimal,
    /// Shipping charge.
    pub shipping: Decimal,
    /// `subtotal + shipping`.
    pub total: Decimal,
    /// Remaining spend before the free-shipping threshold, never negative.
    pub amount_until_free_shipping: Decimal,
}

impl CartSummary {
    /// Price `cart` under `policy`.
    #[must_use]
    pub fn new(cart: &CartState, policy: &ShippingPolicy) -> Self {
        let subtotal = cart.total_price();
        let shipping = policy.shipping_for(cart.is_empty());
        Self {
            item_count: cart.item_count(),
            subtotal,
            shipping,
            total: subtotal.saturating_add(shipping),
            amount_until_free_shipping: policy.amount_until_free_shipping(subtotal),
        }
    }

    /// Whether the subtotal has reached the free-shipping threshold.
    #[must_use]
    pub fn reached_free_shipping_threshold(&self) -> bool {
        self.item_count > 0 && self.amount_until_free_shipping.is_zero()
    }
}

/// Snapshot of a cart handed to the checkout layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderDraft {
    /// Order ID.
    pub id: Uuid,
    /// Customer placing the order.
    pub user_id: CustomerId,
    /// Cart lines at the time of checkout.
    pub items: Vec<CartLine>,
    /// Sum of line totals.
    pub subtotal: Decimal,
    /// Shipping charge.
    pub shipping: Decimal,
    /// Amount to charge.
    pub total: Decimal,
    /// Lifecycle status; drafts start as [`OrderStatus::Pending`].
    pub status: OrderStatus,
    /// When the draft was created.
    pub created_at: DateTime<Utc>,
}

impl OrderDraft {
    /// Draft an order for `user_id` from `cart`.
    ///
    /// The cart itself is left untouched; clearing it after the order is
    /// accepted is up to the caller.
    ///
    /// # Errors
    ///
    /// Returns [`CheckoutError::EmptyCart`] if the cart has no lines.
    #[instrument(skip_all, fields(user_id = %user_id))]
    pub fn from_cart(
        user_id: CustomerId,
        cart: &CartState,
        policy: &ShippingPolicy,
    ) -> Result<Self, CheckoutError> {
        if cart.is_empty() {
            return Err(CheckoutError::EmptyCart);
        }

        let summary = CartSummary::new(cart, policy);
        let draft = Self {
            id: Uuid::new_v4(),
            user_id,
            items: cart.lines().to_vec(),
            subtotal: summary.subtotal,
            shipping: summary.shipping,
            total: summary.total,
            status: OrderStatus::Pending,
            created_at: Utc::now(),
        };

        info!(order_id = %draft.id, total = %draft.total, "Order drafted");
        Ok(draft)
    }
}
