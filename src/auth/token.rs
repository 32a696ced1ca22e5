//! Token pair and token storage.
//!
//! The pipeline never owns tokens. It reads and writes them through a
//! [`TokenStore`], so the application decides where they live (keychain,
//! database, memory). [`InMemoryTokenStore`] covers tests and simple clients.

use std::fmt;
use std::sync::{PoisonError, RwLock};

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// An access/refresh token pair.
///
/// # Security
///
/// The [`Debug`] implementation masks both token values.
///
/// # Example
///
/// ```rust
/// use request_pipeline::AuthToken;
///
/// let token = AuthToken::new("access", "refresh");
/// assert!(!token.expired());
/// assert!(!format!("{token:?}").contains("access"));
/// ```
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthToken {
    /// Bearer token attached to authenticated requests.
    pub access_token: String,
    /// Token exchanged for a new pair when the access token is rejected.
    pub refresh_token: String,
    /// When the access token expires, if the server said so.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<DateTime<Utc>>,
}

impl AuthToken {
    /// Creates a token pair with no known expiry.
    #[must_use]
    pub fn new(access_token: impl Into<String>, refresh_token: impl Into<String>) -> Self {
        Self {
            access_token: access_token.into(),
            refresh_token: refresh_token.into(),
            expires_at: None,
        }
    }

    /// Sets the expiry to `expires_in_seconds` from now.
    ///
    /// A lifetime too large to represent leaves the expiry unknown.
    #[must_use]
    pub fn expiring_in(mut self, expires_in_seconds: i64) -> Self {
        self.expires_at = Duration::try_seconds(expires_in_seconds)
            .and_then(|lifetime| Utc::now().checked_add_signed(lifetime));
        self
    }

    /// Returns `true` if the access token has a known expiry in the past.
    ///
    /// Tokens without an expiry never report as expired; the server's 401 is
    /// the authority for those.
    #[must_use]
    pub fn expired(&self) -> bool {
        self.expires_at.is_some_and(|expires| expires <= Utc::now())
    }
}

impl fmt::Debug for AuthToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthToken")
            .field("access_token", &"*****")
            .field("refresh_token", &"*****")
            .field("expires_at", &self.expires_at)
            .finish()
    }
}

/// Storage for the current token pair.
///
/// Implementations are shared between concurrent calls and must be safe to
/// read while another call writes. The last write wins.
pub trait TokenStore: Send + Sync {
    /// Returns the current access token, if any.
    fn access_token(&self) -> Option<String>;

    /// Returns the current refresh token, if any.
    fn refresh_token(&self) -> Option<String>;

    /// Replaces the stored pair.
    fn set_tokens(&self, token: AuthToken);
}

/// A [`TokenStore`] holding the pair in memory.
///
/// # Example
///
/// ```rust
/// use request_pipeline::{AuthToken, InMemoryTokenStore, TokenStore};
///
/// let store = InMemoryTokenStore::with_token(AuthToken::new("a1", "r1"));
/// assert_eq!(store.access_token().as_deref(), Some("a1"));
///
/// store.set_tokens(AuthToken::new("a2", "r2"));
/// assert_eq!(store.refresh_token().as_deref(), Some("r2"));
/// ```
#[derive(Debug, Default)]
pub struct InMemoryTokenStore {
    token: RwLock<Option<AuthToken>>,
}

impl InMemoryTokenStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store holding `token`.
    #[must_use]
    pub fn with_token(token: AuthToken) -> Self {
        Self {
            token: RwLock::new(Some(token)),
        }
    }

    /// Returns a copy of the stored pair.
    #[must_use]
    pub fn current(&self) -> Option<AuthToken> {
        self.token
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Forgets the stored pair.
    pub fn clear(&self) {
        *self.token.write().unwrap_or_else(PoisonError::into_inner) = None;
    }
}

impl TokenStore for InMemoryTokenStore {
    fn access_token(&self) -> Option<String> {
        self.current().map(|t| t.access_token)
    }

    fn refresh_token(&self) -> Option<String> {
        self.current().map(|t| t.refresh_token)
    }

    fn set_tokens(&self, token: AuthToken) {
        *self.token.write().unwrap_or_else(PoisonError::into_inner) = Some(token);
    }
}

// Verify token types are Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<AuthToken>();
    assert_send_sync::<InMemoryTokenStore>();
};
