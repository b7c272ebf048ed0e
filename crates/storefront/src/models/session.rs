//! Session-related types.
//!
//! The session is the basket's only home. Handlers load it at the start of
//! a request and write it back before responding; nothing else keeps a copy.

use std::fmt;

use serde::{Deserialize, Serialize};
use tower_sessions::Session;

use scoop_core::Basket;

/// Session keys for storefront data.
pub mod keys {
    /// Key for the visitor's basket.
    pub const BASKET: &str = "basket";

    /// Key for a one-shot notice shown on the next rendered page.
    pub const NOTICE: &str = "notice";
}

/// Severity of a flashed notice, used as a CSS modifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NoticeKind {
    Success,
    Info,
}

impl fmt::Display for NoticeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Success => "success",
            Self::Info => "info",
        })
    }
}

/// A message flashed to the next page the visitor sees.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notice {
    pub kind: NoticeKind,
    pub message: String,
}

impl Notice {
    /// A notice confirming a completed action.
    #[must_use]
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Success,
            message: message.into(),
        }
    }

    /// A neutral notice, e.g. an action that could not be carried out.
    #[must_use]
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Info,
            message: message.into(),
        }
    }
}

// =============================================================================
// Session Helpers
// =============================================================================

/// Load the basket from the session, creating an empty one on first access.
///
/// # Errors
///
/// Returns an error if the session store fails or the stored value cannot be
/// decoded.
pub async fn load_basket(session: &Session) -> Result<Basket, tower_sessions::session::Error> {
    Ok(session.get::<Basket>(keys::BASKET).await?.unwrap_or_default())
}

/// Write the basket back to the session.
///
/// # Errors
///
/// Returns an error if the session store fails.
pub async fn save_basket(
    session: &Session,
    basket: &Basket,
) -> Result<(), tower_sessions::session::Error> {
    session.insert(keys::BASKET, basket).await
}

/// Flash a notice for the next rendered page.
///
/// # Errors
///
/// Returns an error if the session store fails.
pub async fn set_notice(
    session: &Session,
    notice: Notice,
) -> Result<(), tower_sessions::session::Error> {
    session.insert(keys::NOTICE, notice).await
}

/// Take the pending notice, if any. A notice is shown once.
///
/// Failures are logged and treated as "no notice".
pub async fn take_notice(session: &Session) -> Option<Notice> {
    match session.remove::<Notice>(keys::NOTICE).await {
        Ok(notice) => notice,
        Err(e) => {
            tracing::warn!("Failed to read notice from session: {e}");
            None
        }
    }
}
