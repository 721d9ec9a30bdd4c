//! Cart commands.
//!
//! # Usage
//!
//! ```bash
//! stash cart add kb1
//! stash cart set kb1 3
//! stash cart remove kb1
//! stash cart show
//! stash cart checkout --user alice
//! ```

use clap::Subcommand;

use seoul_stash_core::CustomerId;
use seoul_stash_storefront::checkout::CartSummary;
use seoul_stash_storefront::store::CartState;
use seoul_stash_storefront::{Storefront, StorefrontError};

use super::settle;

#[derive(Subcommand)]
pub enum CartCommand {
    /// Show cart contents and totals
    Show,
    /// Add one unit of a product
    Add {
        /// Product ID
        id: String,
    },
    /// Remove a product's line
    Remove {
        /// Product ID
        id: String,
    },
    /// Set a product's quantity (0 or less removes it)
    Set {
        /// Product ID
        id: String,
        /// New quantity
        #[arg(allow_negative_numbers = true)]
        quantity: i64,
    },
    /// Empty the cart
    Clear,
    /// Draft an order from the cart and empty it
    Checkout {
        /// Customer placing the order
        #[arg(short, long)]
        user: String,
    },
}

/// Run a cart command.
///
/// # Errors
///
/// Returns an error if the product does not exist, the catalog cannot be
/// queried, or checkout is attempted on an empty cart.
pub async fn run(app: &Storefront, command: CartCommand) -> Result<(), StorefrontError> {
    let cart = app.cart();

    match command {
        CartCommand::Show => {
            let state = cart.state().await;
            print_cart(&state, &CartSummary::new(&state, &app.config().shipping));
        }
        CartCommand::Add { id } => {
            let product = app.catalog().get_by_id(&id.into()).await?;
            tracing::info!(product_id = %product.id, "Adding to cart");
            let state = settle(cart.add_to_cart(product).await);
            print_cart(&state, &CartSummary::new(&state, &app.config().shipping));
        }
        CartCommand::Remove { id } => {
            let state = settle(cart.remove_from_cart(&id.into()).await);
            print_cart(&state, &CartSummary::new(&state, &app.config().shipping));
        }
        CartCommand::Set { id, quantity } => {
            let state = settle(cart.update_quantity(&id.into(), quantity).await);
            print_cart(&state, &CartSummary::new(&state, &app.config().shipping));
        }
        CartCommand::Clear => {
            let state = settle(cart.clear_cart().await);
            print_cart(&state, &CartSummary::new(&state, &app.config().shipping));
        }
        CartCommand::Checkout { user } => {
            let draft = app.checkout(CustomerId::new(user)).await?;
            settle(cart.clear_cart().await);

            #[allow(clippy::print_stdout)]
            {
                println!("Order {} drafted ({})", draft.id, draft.status.as_str());
                println!("{}", serde_json::to_string_pretty(&draft).unwrap_or_default());
            }
        }
    }
    Ok(())
}

#[allow(clippy::print_stdout)]
fn print_cart(state: &CartState, summary: &CartSummary) {
    if state.is_empty() {
        println!("Your cart is empty.");
        return;
    }

    for line in state.lines() {
        println!(
            "{:<6} {:>4} x {:>9}  {}",
            line.product_id().as_str(),
            line.quantity,
            line.product.price.to_string(),
            line.product.name
        );
    }
    println!();
    println!("Items:    {}", summary.item_count);
    println!("Subtotal: ${:.2}", summary.subtotal);
    println!("Shipping: ${:.2}", summary.shipping);
    println!("Total:    ${:.2}", summary.total);
    if !summary.reached_free_shipping_threshold() {
        println!(
            "Add ${:.2} more to reach the free shipping threshold.",
            summary.amount_until_free_shipping
        );
    }
}
