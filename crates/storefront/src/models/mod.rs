//! Domain models for storefront.
//!
//! Catalog and basket types live in `scoop-core`; this module holds the
//! storefront-only values kept in the session.

pub mod session;

pub use session::{Notice, NoticeKind, keys as session_keys};
