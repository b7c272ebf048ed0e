//! Opaque identifiers assigned by the catalog index.
//!
//! The index owns identifier allocation, so [`ProductId`] wraps the raw
//! string without interpreting it. The only rule enforced here is that an
//! identifier coming from a request must contain something other than
//! whitespace.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Identifier of a product document in the catalog index.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductId(String);

impl ProductId {
    /// Wrap an identifier reported by the index.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Parse an identifier supplied by a client.
    ///
    /// Returns `None` for empty or whitespace-only input so callers can treat
    /// malformed requests as a no-op.
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(Self(trimmed.to_string()))
        }
    }

    /// Get the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for ProductId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ProductId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}
