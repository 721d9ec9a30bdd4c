//! Seoul Stash storefront library.
//!
//! Shopper state (cart, wishlist) persisted through a pluggable storage
//! adapter, and a catalog query façade over a pluggable product repository.
//! Consumed by the `stash` CLI and the integration tests.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod catalog;
pub mod checkout;
pub mod config;
pub mod db;
pub mod error;
pub mod persistence;
pub mod state;
pub mod store;

pub use error::{Result, StorefrontError};
pub use state::Storefront;
