//! Static facet sets per category and the facet match predicate.
//!
//! Facet options are matched against the product *name*: a product matches
//! an option when its lowercased name contains the lowercased option label.
//! Products carry no structured facet attributes.

use rust_decimal::Decimal;

use seoul_stash_core::{FacetDescriptor, FacetOption, Product, SelectedFacets};

/// Upper bound of the price range facet.
const PRICE_RANGE_MAX: Decimal = Decimal::ONE_HUNDRED;

fn price_range() -> FacetDescriptor {
    FacetDescriptor::range("price", "Price Range", Decimal::ZERO, PRICE_RANGE_MAX)
}

fn options(pairs: &[(&str, u32)]) -> Vec<FacetOption> {
    pairs
        .iter()
        .map(|&(label, count)| FacetOption::new(label, count))
        .collect()
}

fn k_beauty() -> Vec<FacetDescriptor> {
    vec![
        FacetDescriptor::multi_select(
            "skinType",
            "Skin Type",
            options(&[("Oily", 32), ("Dry", 45), ("Combination", 51), ("Sensitive", 28)]),
        ),
        FacetDescriptor::multi_select(
            "brand",
            "Brand",
            options(&[("COSRX", 18), ("Innisfree", 22), ("Laneige", 12), ("Some By Mi", 15)]),
        ),
        price_range(),
    ]
}

fn k_pop() -> Vec<FacetDescriptor> {
    vec![
        FacetDescriptor::multi_select(
            "group",
            "Group",
            options(&[("BTS", 40), ("BLACKPINK", 35), ("Stray Kids", 28), ("TWICE", 31)]),
        ),
        FacetDescriptor::multi_select(
            "productType",
            "Product Type",
            options(&[("Albums", 78), ("Lightsticks", 12), ("Official Merch", 44)]),
        ),
        price_range(),
    ]
}

fn snacks() -> Vec<FacetDescriptor> {
    vec![
        FacetDescriptor::multi_select(
            "flavor",
            "Flavor",
            options(&[("Spicy", 15), ("Sweet", 30), ("Savory", 22)]),
        ),
        FacetDescriptor::multi_select(
            "type",
            "Type",
            options(&[("Chips & Crisps", 18), ("Drinks", 27), ("Sweets & Cookies", 22)]),
        ),
        price_range(),
    ]
}

/// Facet descriptors offered for `category` (case-insensitive).
///
/// Unknown categories get no facets.
#[must_use]
pub fn facets_for_category(category: &str) -> Vec<FacetDescriptor> {
    match category.to_lowercase().as_str() {
        "k-beauty" => k_beauty(),
        "k-pop" => k_pop(),
        "snacks" => snacks(),
        "k-fashion" => vec![price_range()],
        _ => Vec::new(),
    }
}

/// Whether `product` matches the option `label`.
#[must_use]
pub fn matches_option(product: &Product, label: &str) -> bool {
    product
        .name
        .to_lowercase()
        .contains(&label.to_lowercase())
}

/// Whether `product` satisfies `selected`.
///
/// Every facet with a non-empty selection must match at least one of its
/// selected labels.
#[must_use]
pub fn matches_selection(product: &Product, selected: &SelectedFacets) -> bool {
    selected
        .active()
        .all(|(_, labels)| labels.iter().any(|label| matches_option(product, label)))
}
