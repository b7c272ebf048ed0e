//! Scoop Core - Shared types library.
//!
//! This crate provides the domain types used by the Scoop storefront:
//! - [`Product`] snapshots as returned by the catalog index
//! - [`Price`] amounts with exact decimal arithmetic
//! - [`Basket`] per-session collections and the mock checkout transition
//!
//! # Architecture
//!
//! The core crate contains only types and pure logic - no I/O, no HTTP
//! clients, no session handling. Callers own where a [`Basket`] is stored.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for identifiers, prices, and products
//! - [`basket`] - Basket operations and checkout

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod basket;
pub mod types;

pub use basket::{Basket, CheckoutError, Receipt};
pub use types::*;
