//! Shopping cart store.
//!
//! The cart is a list of [`CartLine`]s keyed by product ID. Every stored line
//! has `quantity >= 1`; a line whose quantity would drop to zero is removed.

use std::sync::Arc;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use seoul_stash_core::{CartLine, Product, ProductId};

use super::{CollectionPolicy, Commit, PersistedCollection, StoreError};
use crate::persistence::PersistenceAdapter;

/// Storage key for the cart document.
pub const CART_STORAGE_KEY: &str = "seoulstash_cart";

/// A cart mutation.
#[derive(Debug, Clone, PartialEq)]
pub enum CartAction {
    /// Add one unit of the product, creating the line if needed.
    Add(Product),
    /// Drop the line for a product.
    Remove(ProductId),
    /// Set a line's quantity; zero or less removes the line.
    UpdateQuantity {
        /// Product whose line is updated.
        id: ProductId,
        /// New quantity.
        quantity: i64,
    },
    /// Remove every line.
    Clear,
}

/// Immutable view of the cart contents.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CartState {
    lines: Vec<CartLine>,
}

impl CartState {
    /// Build a state from lines, as stored.
    #[must_use]
    pub const fn from_lines(lines: Vec<CartLine>) -> Self {
        Self { lines }
    }

    /// Pure transition: the state that results from applying `action`.
    #[must_use]
    pub fn reduce(&self, action: CartAction) -> Self {
        Self {
            lines: reduce_lines(&self.lines, action),
        }
    }

    /// Lines in insertion order.
    #[must_use]
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    /// The line for `id`, if present.
    #[must_use]
    pub fn line(&self, id: &ProductId) -> Option<&CartLine> {
        self.lines.iter().find(|line| line.product_id() == id)
    }

    /// Whether the cart has no lines.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Total number of units across all lines.
    #[must_use]
    pub fn item_count(&self) -> u64 {
        self.lines.iter().map(|line| u64::from(line.quantity)).sum()
    }

    /// Sum of `price * quantity` over all lines.
    #[must_use]
    pub fn total_price(&self) -> Decimal {
        CartLine::total_of(&self.lines)
    }

    /// Consume the state, returning its lines.
    #[must_use]
    pub fn into_lines(self) -> Vec<CartLine> {
        self.lines
    }
}

fn reduce_lines(lines: &[CartLine], action: CartAction) -> Vec<CartLine> {
    match action {
        CartAction::Add(product) => {
            let mut next = lines.to_vec();
            match next.iter_mut().find(|line| line.product.id == product.id) {
                Some(line) => line.quantity = line.quantity.saturating_add(1),
                None => next.push(CartLine::new(product)),
            }
            next
        }
        CartAction::Remove(id) => lines
            .iter()
            .filter(|line| *line.product_id() != id)
            .cloned()
            .collect(),
        CartAction::UpdateQuantity { id, quantity } => {
            let Ok(quantity @ 1..) = u32::try_from(quantity.min(i64::from(u32::MAX))) else {
                return reduce_lines(lines, CartAction::Remove(id));
            };
            lines
                .iter()
                .cloned()
                .map(|mut line| {
                    if *line.product_id() == id {
                        line.quantity = quantity;
                    }
                    line
                })
                .collect()
        }
        CartAction::Clear => Vec::new(),
    }
}

/// Cart rules for [`PersistedCollection`].
pub struct CartPolicy;

impl CollectionPolicy for CartPolicy {
    type Item = CartLine;
    type Action = CartAction;

    const NAME: &'static str = "cart";

    fn key_of(item: &CartLine) -> &ProductId {
        item.product_id()
    }

    fn reduce(items: &[CartLine], action: CartAction) -> Vec<CartLine> {
        reduce_lines(items, action)
    }

    fn merge(existing: &mut CartLine, duplicate: CartLine) {
        existing.quantity = existing.quantity.saturating_add(duplicate.quantity);
    }

    fn is_valid(item: &CartLine) -> bool {
        item.quantity >= 1
    }
}

/// The shopper's cart, persisted under [`CART_STORAGE_KEY`].
///
/// Construct one per shopper session and pass it to whatever needs it.
#[derive(Clone)]
pub struct CartStore {
    lines: PersistedCollection<CartPolicy>,
}

impl CartStore {
    /// Load the cart from `storage`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Retrieval`] if storage cannot be read.
    pub async fn open(storage: Arc<dyn PersistenceAdapter>) -> Result<Self, StoreError> {
        Self::open_with_key(storage, CART_STORAGE_KEY).await
    }

    /// Load the cart from `storage` under a custom key (e.g. per customer).
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Retrieval`] if storage cannot be read.
    pub async fn open_with_key(
        storage: Arc<dyn PersistenceAdapter>,
        key: &str,
    ) -> Result<Self, StoreError> {
        Ok(Self {
            lines: PersistedCollection::open(storage, key).await?,
        })
    }

    /// Storage key the cart writes to.
    #[must_use]
    pub fn key(&self) -> &str {
        self.lines.key()
    }

    /// Add one unit of `product`.
    #[instrument(skip(self, product), fields(product_id = %product.id))]
    pub async fn add_to_cart(&self, product: Product) -> Commit<CartState> {
        self.apply(CartAction::Add(product)).await
    }

    /// Remove the line for `id`, if any.
    #[instrument(skip(self), fields(product_id = %id))]
    pub async fn remove_from_cart(&self, id: &ProductId) -> Commit<CartState> {
        self.apply(CartAction::Remove(id.clone())).await
    }

    /// Set the quantity for `id`; `quantity <= 0` removes the line.
    ///
    /// Unknown IDs are ignored.
    #[instrument(skip(self), fields(product_id = %id))]
    pub async fn update_quantity(&self, id: &ProductId, quantity: i64) -> Commit<CartState> {
        self.apply(CartAction::UpdateQuantity {
            id: id.clone(),
            quantity,
        })
        .await
    }

    /// Remove every line.
    #[instrument(skip(self))]
    pub async fn clear_cart(&self) -> Commit<CartState> {
        self.apply(CartAction::Clear).await
    }

    /// Apply an arbitrary action.
    pub async fn apply(&self, action: CartAction) -> Commit<CartState> {
        self.lines.dispatch(action).await.map(CartState::from_lines)
    }

    /// Current cart contents.
    pub async fn state(&self) -> CartState {
        CartState::from_lines(self.lines.snapshot().await)
    }

    /// Total number of units in the cart.
    pub async fn item_count(&self) -> u64 {
        self.lines
            .read(|lines| lines.iter().map(|line| u64::from(line.quantity)).sum())
            .await
    }

    /// Sum of `price * quantity` over the cart.
    pub async fn total_price(&self) -> Decimal {
        self.lines
            .read(CartLine::total_of)
            .await
    }
}
