//! Core types for Seoul Stash.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod cart;
pub mod facet;
pub mod id;
pub mod price;
pub mod product;
pub mod rating;
pub mod status;

pub use cart::CartLine;
pub use facet::{FacetDescriptor, FacetKind, FacetOption, SelectedFacets};
pub use id::*;
pub use price::{Price, PriceError};
pub use product::{Category, Product};
pub use rating::{Rating, RatingError};
pub use status::*;
