//! Scoop storefront library.
//!
//! Catalog browsing and search backed by an `OpenSearch` index, with a
//! session-held basket and a mock checkout. Exposed as a library so the
//! router can be driven from integration tests.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod catalog;
pub mod config;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod search;
pub mod state;
