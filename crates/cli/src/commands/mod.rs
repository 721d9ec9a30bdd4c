//! CLI command implementations.

pub mod cart;
pub mod catalog;
pub mod migrate;
pub mod wishlist;

use seoul_stash_core::Product;
use seoul_stash_storefront::store::Commit;

/// Log a persistence warning, if any, and return the committed state.
///
/// The command still succeeds: the change was applied but may not survive
/// this process.
pub fn settle<T>(commit: Commit<T>) -> T {
    if let Some(warning) = commit.warning() {
        tracing::warn!(key = %warning.key, error = %warning.source, "Change was not saved");
    }
    commit.into_state()
}

/// One line per product: ID, price, name and tags.
#[allow(clippy::print_stdout)]
pub fn print_products(products: &[Product]) {
    if products.is_empty() {
        println!("No products found.");
        return;
    }

    for product in products {
        let tags = if product.tags.is_empty() {
            String::new()
        } else {
            format!(
                "  [{}]",
                product.tags.iter().map(String::as_str).collect::<Vec<_>>().join(", ")
            )
        };
        println!(
            "{:<6} {:>9}  {}{tags}",
            product.id.as_str(),
            product.price.to_string(),
            product.name
        );
    }
}
