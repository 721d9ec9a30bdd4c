//! Seoul Stash Core - Shared types library.
//!
//! This crate provides the domain types used across all Seoul Stash components:
//! - `storefront` - Cart/wishlist stores and the catalog query engine
//! - `cli` - Command-line shopper and maintenance tools
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no database access,
//! no HTTP clients. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - IDs, prices, ratings, products, cart lines, facets and statuses

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
