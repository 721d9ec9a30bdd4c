//! Wishlist commands.

use clap::Subcommand;

use seoul_stash_storefront::{Storefront, StorefrontError};

use super::{print_products, settle};

#[derive(Subcommand)]
pub enum WishlistCommand {
    /// Show saved products
    Show,
    /// Save a product
    Add {
        /// Product ID
        id: String,
    },
    /// Forget a product
    Remove {
        /// Product ID
        id: String,
    },
}

/// Run a wishlist command.
///
/// # Errors
///
/// Returns an error if the product does not exist or the catalog cannot be
/// queried.
pub async fn run(app: &Storefront, command: WishlistCommand) -> Result<(), StorefrontError> {
    let wishlist = app.wishlist();

    let state = match command {
        WishlistCommand::Show => wishlist.state().await,
        WishlistCommand::Add { id } => {
            let product = app.catalog().get_by_id(&id.into()).await?;
            settle(wishlist.add_to_wishlist(product).await)
        }
        WishlistCommand::Remove { id } => settle(wishlist.remove_from_wishlist(&id.into()).await),
    };

    print_products(state.entries());
    Ok(())
}
