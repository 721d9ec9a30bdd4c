//! Catalog query commands.
//!
//! # Usage
//!
//! ```bash
//! stash catalog list k-beauty --facet brand=COSRX --facet brand=Laneige
//! stash catalog featured
//! stash catalog search "honey butter"
//! stash catalog show kb1
//! stash catalog facets snacks
//! ```

use clap::Subcommand;

use seoul_stash_core::{FacetKind, SelectedFacets};
use seoul_stash_storefront::Storefront;
use seoul_stash_storefront::catalog::{CatalogError, category_name_from_slug};

use super::print_products;

#[derive(Subcommand)]
pub enum CatalogCommand {
    /// List products in a category
    List {
        /// Category name or slug (e.g. `K-Beauty` or `k-beauty`)
        category: String,

        /// Facet selection as `id=label`; repeat to select more
        #[arg(short, long = "facet", value_parser = parse_facet)]
        facets: Vec<(String, String)>,
    },
    /// Best sellers and editor's picks
    Featured,
    /// New arrivals
    New,
    /// Products on offer
    Offers,
    /// List top-level categories
    Categories,
    /// Search product names and categories
    Search {
        /// Text to look for
        text: String,
    },
    /// Show a single product
    Show {
        /// Product ID
        id: String,
    },
    /// Show the facets offered for a category
    Facets {
        /// Category name or slug
        category: String,
    },
}

fn parse_facet(raw: &str) -> Result<(String, String), String> {
    match raw.split_once('=') {
        Some((id, label)) if !id.trim().is_empty() && !label.trim().is_empty() => {
            Ok((id.trim().to_owned(), label.trim().to_owned()))
        }
        _ => Err(format!("expected id=label, got '{raw}'")),
    }
}

/// Run a catalog query.
///
/// # Errors
///
/// Returns [`CatalogError`] if the catalog cannot be queried or the product
/// does not exist.
#[allow(clippy::print_stdout)]
pub async fn run(app: &Storefront, command: CatalogCommand) -> Result<(), CatalogError> {
    let catalog = app.catalog();

    match command {
        CatalogCommand::List { category, facets } => {
            let name = category_name_from_slug(&category);
            let selected: SelectedFacets = facets.into_iter().collect();
            print_products(&catalog.list_by_category(&name, &selected).await?);
        }
        CatalogCommand::Featured => print_products(&catalog.list_featured().await?),
        CatalogCommand::New => print_products(&catalog.list_new().await?),
        CatalogCommand::Offers => print_products(&catalog.list_offers().await?),
        CatalogCommand::Categories => {
            for category in catalog.list_categories().await? {
                println!(
                    "{:<10} {:<10} {} products",
                    category.slug(),
                    category.name,
                    category.product_count
                );
            }
        }
        CatalogCommand::Search { text } => print_products(&catalog.search(&text).await?),
        CatalogCommand::Show { id } => {
            let product = catalog.get_by_id(&id.into()).await?;
            println!("{} ({})", product.name, product.id);
            println!("Category: {}", product.category);
            match (product.original_price, product.discount_percent()) {
                (Some(original), Some(percent)) => {
                    println!("Price:    {} (was {original}, -{percent}%)", product.price);
                }
                _ => println!("Price:    {}", product.price),
            }
            println!("Rating:   {} ({} reviews)", product.rating, product.review_count);
            if !product.tags.is_empty() {
                let tags: Vec<&str> = product.tags.iter().map(String::as_str).collect();
                println!("Tags:     {}", tags.join(", "));
            }
            if let Some(description) = &product.description {
                println!();
                println!("{description}");
            }
        }
        CatalogCommand::Facets { category } => {
            let name = category_name_from_slug(&category);
            let facets = catalog.list_facets_for_category(&name);
            if facets.is_empty() {
                println!("No facets for {name}.");
            }
            for facet in facets {
                match facet.kind {
                    FacetKind::MultiSelect => {
                        println!("{} ({})", facet.title, facet.id);
                        for option in &facet.options {
                            println!("  {:<20} {}", option.label, option.count);
                        }
                    }
                    FacetKind::Range => {
                        let min = facet.min.unwrap_or_default();
                        let max = facet.max.unwrap_or_default();
                        println!("{} ({}): {min} - {max}", facet.title, facet.id);
                    }
                }
            }
        }
    }
    Ok(())
}
