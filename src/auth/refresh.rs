//! Token refresh.
//!
//! [`TokenRefresher`] exchanges the stored refresh token for a new pair with a
//! single unauthenticated POST, stores the new pair, then returns it. It does
//! not retry and does not coalesce; both are the orchestrator's job.
//!
//! # Wire format
//!
//! Request body: `{"refreshToken": "<token>"}`.
//!
//! Response payload (inside the refresh endpoint's envelope):
//! `{"accessToken": "...", "refreshToken": "...", "expiresIn": 3600}`, with
//! `expiresIn` in seconds and optional.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::auth::token::{AuthToken, TokenStore};
use crate::clients::{
    decode_response, AuthMode, Endpoint, HttpBody, HttpMethod, NetworkRequest,
    NetworkRequestError, RequestSender,
};

/// Request body for token refresh.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct RefreshTokenRequest<'a> {
    refresh_token: &'a str,
}

/// Payload returned by the refresh endpoint.
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshTokenResponse {
    /// The new access token.
    pub access_token: String,
    /// The new refresh token.
    pub refresh_token: String,
    /// Lifetime of the access token in seconds.
    #[serde(default)]
    pub expires_in: Option<i64>,
}

impl From<RefreshTokenResponse> for AuthToken {
    fn from(response: RefreshTokenResponse) -> Self {
        let token = Self::new(response.access_token, response.refresh_token);
        match response.expires_in {
            Some(seconds) => token.expiring_in(seconds),
            None => token,
        }
    }
}

/// Performs the refresh call and persists its result.
///
/// Cloning is cheap; clones share the transport and store.
#[derive(Clone)]
pub struct TokenRefresher {
    sender: RequestSender,
    store: Arc<dyn TokenStore>,
    endpoint: Endpoint,
}

impl TokenRefresher {
    /// Creates a refresher posting to `endpoint`.
    #[must_use]
    pub fn new(sender: RequestSender, store: Arc<dyn TokenStore>, endpoint: Endpoint) -> Self {
        Self {
            sender,
            store,
            endpoint,
        }
    }

    /// Returns the refresh endpoint.
    #[must_use]
    pub const fn endpoint(&self) -> &Endpoint {
        &self.endpoint
    }

    /// Exchanges the stored refresh token for a new pair.
    ///
    /// A missing refresh token is sent as an empty string and left for the
    /// server to reject. On success the new pair is written to the store
    /// before it is returned.
    ///
    /// # Errors
    ///
    /// Returns the classified [`NetworkRequestError`] of the refresh call, or
    /// a decoding error if its body is not a token pair.
    pub async fn refresh(&self) -> Result<AuthToken, NetworkRequestError> {
        let refresh_token = self.store.refresh_token().unwrap_or_default();
        let body = HttpBody::json(&RefreshTokenRequest {
            refresh_token: &refresh_token,
        })?;

        let request = NetworkRequest::builder(HttpMethod::Post, self.endpoint.clone())
            .body(body)
            .auth_mode(AuthMode::Skip)
            .build();

        let bytes = self.sender.send(&request, None).await.map_err(|e| {
            tracing::warn!(error = %e, "token refresh failed");
            e
        })?;
        let response: RefreshTokenResponse = decode_response(&bytes, &self.endpoint)?;
        let token = AuthToken::from(response);

        self.store.set_tokens(token.clone());
        tracing::info!(expires_at = ?token.expires_at, "access token refreshed");

        Ok(token)
    }
}

impl fmt::Debug for TokenRefresher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenRefresher")
            .field("sender", &self.sender)
            .field("endpoint", &self.endpoint)
            .finish_non_exhaustive()
    }
}
